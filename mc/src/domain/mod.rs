//! Domain types for the coordinator
//!
//! Events flow in from producers, responses flow out of agents. Both carry
//! a [`Category`] that decides which agent handles them.

mod category;
mod message;

pub use category::Category;
pub use message::{Event, Response};
