//! Line decoration flags
//!
//! Bits are or'ed together to choose which metadata precedes each line. Except
//! for `MSG_PREFIX` there is no control over the order of the fields, which
//! always appear as date, time, caller location. For example `DATE | TIME`
//! produces
//!
//! ```text
//! 2009/01/23 01:23:23 message
//! ```
//!
//! while `DATE | TIME | MICROSECONDS | LONG_FILE` produces
//!
//! ```text
//! 2009/01/23 01:23:23.123123 /a/b/c/d.rs:23: message
//! ```

use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::Error;

bitflags! {
    /// Decoration flags for a line writer.
    #[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
    #[serde(transparent)]
    pub struct Flags: u32 {
        /// Date in the configured clock: 2009/01/23
        const DATE          =        0b0000001;
        /// Time in the configured clock: 01:23:23
        const TIME          =        0b0000010;
        /// Microsecond resolution: 01:23:23.123123. Implies `TIME`.
        const MICROSECONDS  =        0b0000100;
        /// Full source path and line of the caller: /a/b/c/d.rs:23
        const LONG_FILE     =        0b0001000;
        /// Final path element and line of the caller: d.rs:23.
        /// Overrides `LONG_FILE`.
        const SHORT_FILE    =        0b0010000;
        /// Use UTC rather than the local time zone for `DATE` and `TIME`
        const UTC           =        0b0100000;
        /// Move the prefix from the start of the line to just before
        /// the message
        const MSG_PREFIX    =        0b1000000;
        /// Initial values for a standard logger
        const STD           = Self::DATE.bits() | Self::TIME.bits();
    }
}

impl Flags {
    /// Whether any clock field (date or time) is written
    pub fn has_clock(&self) -> bool {
        self.intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS)
    }

    /// Whether the time of day is written
    pub fn has_time(&self) -> bool {
        self.intersects(Flags::TIME | Flags::MICROSECONDS)
    }

    /// Whether the caller location is written
    pub fn has_caller(&self) -> bool {
        self.intersects(Flags::LONG_FILE | Flags::SHORT_FILE)
    }
}

impl FromStr for Flags {
    type Err = Error;

    /// Parse a `|` separated list of flag names, e.g. `DATE | TIME | UTC`
    ///
    /// Names are case-insensitive and raw bits may be given in hex, e.g.
    /// `0x41`. An empty string yields no flags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .split('|')
            .map(|token| {
                let token = token.trim();
                match token.get(..2) {
                    Some("0x") | Some("0X") => format!("0x{}", &token[2..]),
                    _ => token.to_ascii_uppercase(),
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        bitflags::parser::from_str(&normalized).map_err(|_| Error::InvalidFlags(s.to_string()))
    }
}
