use thiserror::Error;

/// Errors that can occur while delivering replies through a channel adapter.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// A message could not be delivered to the remote endpoint.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Delivery of a multi-part reply stopped part-way.
    #[error("Delivery interrupted after {delivered} message(s): {reason}")]
    Interrupted { delivered: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ChannelError>;
