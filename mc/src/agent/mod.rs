//! Agents and their handlers
//!
//! An [`Agent`] binds a name to one [`Category`](crate::domain::Category) and a
//! [`Handler`] that turns events into response text. Handlers are any type
//! implementing the trait, including plain closures.

mod handler;
mod persona;
mod record;
mod template;

pub use handler::{Handler, HandlerResult};
pub use persona::Persona;
pub use record::Agent;
pub use template::TemplateHandler;
