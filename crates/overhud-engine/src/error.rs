use std::result::Result as StdResult;

use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the overlay coordinator.
#[derive(Debug, Error)]
pub enum Error {
    /// A live surface already holds the requested name.
    #[error("surface name already registered: {0}")]
    DuplicateName(String),

    /// The compositor session was started a second time.
    #[error("overlay session already started")]
    AlreadyStarted,

    /// The compositor library failed to start or is unavailable.
    #[error("compositor session error: {0}")]
    Session(String),

    /// The coordinator loop has shut down and dropped its receiver.
    #[error("coordinator loop closed")]
    ChannelClosed,
}
