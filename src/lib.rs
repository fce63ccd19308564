//! leveled-log - a minimal leveled logging facade
//!
//! A [`Logger`] wraps a line writer, drops messages below its minimum
//! [`Level`] and prefixes every written line with the fixed-width level name.
//! The free functions at the crate root forward to a process-wide default
//! logger on standard error.
//!
//! ```no_run
//! use leveled_log::{Flags, Level};
//!
//! leveled_log::set_level(Level::Debug);
//! leveled_log::info("service started");
//! leveled_log::warnf(format_args!("{} retries left", 2));
//! leveled_log::set_flags(Flags::STD | Flags::SHORT_FILE);
//! leveled_log::debug(leveled_log::sprint!("cache hits:", 93));
//! ```

pub mod capture;
pub mod config;
mod error;
pub mod flags;
mod global;
pub mod level;
pub mod logger;
pub mod operand;
pub mod writer;

pub use capture::{CaptureBuffer, CaptureWriter};
pub use config::Config;
pub use error::Error;
pub use flags::Flags;
pub use global::{
    debug, debugf, default, error, errorf, fatal, fatalf, info, infof, init, logger, panic,
    panicf, set_flags, set_level, warn, warnf, DEFAULT_FLAGS,
};
pub use level::{level_name, Level};
pub use logger::{Log, Logger, ProcessTerminate, Terminate, FATAL_EXIT_CODE};
pub use operand::{sprint, Operand};
