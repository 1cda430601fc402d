//! Error types for the tether runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the session, transport, and scheduler layers.
///
/// Nothing here is fatal to the process: channel-level failures feed the
/// session's fixed-interval reconnect, and scheduler rejections are reported
/// back to the caller as structured acks.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to establish the control channel.
    #[error("Failed to connect to controller: {0}")]
    ConnectionFailed(String),

    /// Sending or receiving on an established channel failed.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Channel closed unexpectedly.
    #[error("Channel closed unexpectedly")]
    ChannelClosed,

    /// Payload submitted while the session was not open; it was dropped.
    #[error("Session is not open; payload dropped")]
    NotOpen,

    /// A plan is already executing; no queueing, no preemption.
    #[error("Scheduler is busy with an in-flight plan")]
    SchedulerBusy,

    /// Submitted plan contains no steps.
    #[error("Action plan has no steps")]
    EmptyPlan,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timeout waiting for operation.
    #[error("Timeout: {0}")]
    Timeout(String),
}

impl Error {
    /// Returns true if this is the scheduler's busy rejection.
    pub fn is_busy(&self) -> bool {
        matches!(self, Error::SchedulerBusy)
    }

    /// Returns true if a payload was dropped because the session was not open.
    pub fn is_not_open(&self) -> bool {
        matches!(self, Error::NotOpen)
    }

    /// Returns true if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
