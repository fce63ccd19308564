//! Process-wide default logger
//!
//! The free functions at the crate root forward to the logger returned by
//! [`default`], which is created on first use unless one was installed with
//! [`init`] before.

use std::fmt::{self, Display};
use std::sync::OnceLock;

use crate::flags::Flags;
use crate::level::Level;
use crate::logger::{Log, Logger};
use crate::Error;

static DEFAULT: OnceLock<Logger> = OnceLock::new();

/// Flags of the logger created by [`default`]
pub const DEFAULT_FLAGS: Flags = Flags::STD.union(Flags::MSG_PREFIX);

/// The default logger
///
/// Created on first call, writing to standard error with [`DEFAULT_FLAGS`] at
/// [`Level::Info`]. Every call returns the same instance.
pub fn default() -> &'static Logger {
    DEFAULT.get_or_init(|| {
        tracing::debug!("Creating default logger on stderr");
        Logger::stderr(DEFAULT_FLAGS)
    })
}

/// The default logger as a [`Log`] trait object
pub fn logger() -> &'static dyn Log {
    default()
}

/// Install `logger` as the default logger
///
/// Fails with [`Error::AlreadyInitialized`] once the default logger exists,
/// whether it was installed or created by [`default`].
pub fn init(logger: Logger) -> Result<&'static Logger, Error> {
    let mut logger = Some(logger);
    let installed = DEFAULT.get_or_init(|| {
        tracing::debug!("Installing default logger");
        logger.take().unwrap_or_else(|| Logger::stderr(DEFAULT_FLAGS))
    });
    if logger.is_some() {
        return Err(Error::AlreadyInitialized);
    }
    Ok(installed)
}

/// Set the level of the default logger
pub fn set_level(level: Level) {
    default().set_level(level);
}

/// Set the decoration flags of the default logger
pub fn set_flags(flags: Flags) {
    default().set_flags(flags);
}

/// Log at [`Level::Debug`] with the default logger
#[track_caller]
pub fn debug(message: impl Display) {
    default().debug(message);
}

/// Log formatted arguments at [`Level::Debug`] with the default logger
#[track_caller]
pub fn debugf(args: fmt::Arguments<'_>) {
    default().debugf(args);
}

/// Log at [`Level::Info`] with the default logger
#[track_caller]
pub fn info(message: impl Display) {
    default().info(message);
}

/// Log formatted arguments at [`Level::Info`] with the default logger
#[track_caller]
pub fn infof(args: fmt::Arguments<'_>) {
    default().infof(args);
}

/// Log at [`Level::Warn`] with the default logger
#[track_caller]
pub fn warn(message: impl Display) {
    default().warn(message);
}

/// Log formatted arguments at [`Level::Warn`] with the default logger
#[track_caller]
pub fn warnf(args: fmt::Arguments<'_>) {
    default().warnf(args);
}

/// Log at [`Level::Error`] with the default logger
#[track_caller]
pub fn error(message: impl Display) {
    default().error(message);
}

/// Log formatted arguments at [`Level::Error`] with the default logger
#[track_caller]
pub fn errorf(args: fmt::Arguments<'_>) {
    default().errorf(args);
}

/// Log at [`Level::Fatal`] with the default logger, then exit
#[track_caller]
pub fn fatal(message: impl Display) {
    default().fatal(message);
}

/// Log formatted arguments at [`Level::Fatal`] with the default logger, then exit
#[track_caller]
pub fn fatalf(args: fmt::Arguments<'_>) {
    default().fatalf(args);
}

/// Log at [`Level::Panic`] with the default logger, then panic
#[track_caller]
pub fn panic(message: impl Display) {
    default().panic(message);
}

/// Log formatted arguments at [`Level::Panic`] with the default logger, then panic
#[track_caller]
pub fn panicf(args: fmt::Arguments<'_>) {
    default().panicf(args);
}
