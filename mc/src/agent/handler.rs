//! Handler trait definition

use crate::domain::Event;
use crate::error::HandlerError;

/// Result of handling one event
pub type HandlerResult = Result<String, HandlerError>;

/// Maps an incoming event to response text
///
/// Handlers run synchronously on the coordinator's thread and must not
/// block on I/O.
pub trait Handler: Send + Sync {
    fn handle(&self, event: &Event) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Event) -> String + Send + Sync,
{
    fn handle(&self, event: &Event) -> HandlerResult {
        Ok(self(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_handler() {
        let handler = |event: &Event| format!("echo: {}", event.payload());
        let event = Event::parse("mall-event", "hello").unwrap();

        assert_eq!(handler.handle(&event).unwrap(), "echo: hello");
    }

    #[test]
    fn test_boxed_handler() {
        let handler: Box<dyn Handler> = Box::new(|event: &Event| event.category().to_string());
        let event = Event::parse("retail-operations", "restock").unwrap();

        assert_eq!(handler.handle(&event).unwrap(), "retail-operations");
    }
}
