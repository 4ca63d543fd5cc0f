use crate::config::Config;
use crate::error::Result;
use crate::events::StreamClosed;

/// Trait for line-oriented event sources
#[async_trait::async_trait]
pub trait EventSource: Send {
    /// Next raw line, or `None` once the stream has ended
    async fn next_line(&mut self) -> Result<Option<String>>;

    /// Release the source and report how the stream ended
    async fn close(self: Box<Self>) -> Result<StreamClosed>;
}

/// Factory function to create an event source: a recorded file when replaying,
/// otherwise the live capture process
pub fn create_event_source(config: &Config) -> Result<Box<dyn EventSource>> {
    match &config.input.replay {
        Some(path) => Ok(Box::new(super::replay::ReplaySource::open(path)?)),
        None => Ok(Box::new(super::LibinputSource::start(
            &config.input.device,
            &config.input.capture_binary,
        )?)),
    }
}
