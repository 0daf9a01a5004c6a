//! Inbound message-source interface.
//!
//! The verification pipeline consumes opaque byte messages one at a time and
//! commits each offset once the message has been fully processed. A real
//! message-broker client implements [`BatchSource`]; [`replay::ReplaySource`]
//! reads the same messages back from a newline-delimited JSON file.

pub mod replay;

use thiserror::Error;

/// A transport-level fault. There is no retry at this layer; callers treat
/// any `SourceError` as fatal.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read from the message source: {0}")]
    Io(#[from] std::io::Error),
}

/// One opaque message as delivered by the broker.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMessage {
    pub payload: Vec<u8>,
    pub offset: u64,
}

#[allow(async_fn_in_trait)]
pub trait BatchSource {
    /// Next message in offset order, or `None` once the source is drained.
    async fn next_message(&mut self) -> Result<Option<SourceMessage>, SourceError>;

    /// Acknowledges that the message at `offset` has been processed.
    async fn commit(&mut self, offset: u64) -> Result<(), SourceError>;
}
