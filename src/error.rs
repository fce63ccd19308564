//! Error types for leveled-log

use thiserror::Error;

/// Errors raised while configuring a logger
#[derive(Debug, Error)]
pub enum Error {
    /// A raw rank that does not name one of the six levels
    #[error("unknown log level rank {0} (expected 0 to 5)")]
    UnknownLevel(i64),

    /// A level name that could not be parsed
    #[error("unknown log level '{0}'")]
    UnknownLevelName(String),

    /// A flag expression that could not be parsed
    #[error("invalid log flags '{0}'")]
    InvalidFlags(String),

    /// The default logger was already created
    #[error("the default logger is already initialized")]
    AlreadyInitialized,
}
