//! Severity levels
//!
//! Levels are strictly ordered by rank. Each one has a fixed-width name used
//! as the line prefix so messages stay aligned in the output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Severity of a log line
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    /// Logs the line, then exits the process
    Fatal = 4,
    /// Logs the line, then panics with the message
    Panic = 5,
}

impl Level {
    /// All levels, lowest first
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    /// Get the fixed-width (5 character) display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO ",
            Level::Warn => "WARN ",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
        }
    }

    /// Numeric rank used for ordering
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub(crate) fn from_rank(rank: u8) -> Option<Level> {
        Level::ALL.get(rank as usize).copied()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for Level {
    type Error = Error;

    fn try_from(rank: i64) -> Result<Self, Error> {
        u8::try_from(rank)
            .ok()
            .and_then(Level::from_rank)
            .ok_or(Error::UnknownLevel(rank))
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            "panic" => Ok(Level::Panic),
            _ => Err(Error::UnknownLevelName(s.to_string())),
        }
    }
}

/// Display name for a raw rank
///
/// Ranks outside the six defined levels have no name and yield `""`.
pub fn level_name(rank: i64) -> &'static str {
    Level::try_from(rank).map(|l| l.as_str()).unwrap_or("")
}
