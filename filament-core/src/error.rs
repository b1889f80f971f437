//! Error types shared across the crate.
//!
//! Recoverable conditions (transport failures, a closed outbound queue,
//! malformed configuration) are reported through [`Error`]. Mistakes in how a
//! component tree is built, such as an unknown remote component kind or an
//! event listener that is not a callback, are programming errors and panic
//! instead.

use std::time::Duration;

use thiserror::Error;

use crate::render::ComponentId;

/// Errors produced by the runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// The outbound queue was closed because the connection went away.
    #[error("outbound queue is closed")]
    QueueClosed,

    /// No peer completed the handshake before the construction gate timed out.
    #[error("no peer connected within {0:?}")]
    ConnectTimeout(Duration),

    /// The listener stopped accepting before any peer attached.
    #[error("listener stopped before a peer connected")]
    ListenerStopped,

    /// An operation needed a backend handle that the component does not have yet.
    #[error("component {0} is not mounted")]
    NotMounted(ComponentId),

    /// An outbound record could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound record was not a valid event.
    #[error("malformed event: {0}")]
    Decode(#[source] serde_json::Error),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The global tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
