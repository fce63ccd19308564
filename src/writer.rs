//! Decorated line writer
//!
//! The sink every logger writes through. It owns the destination stream, the
//! current prefix and the decoration flags, and turns a message into a single
//! line of the form
//!
//! ```text
//! [prefix][date ][time ][file:line: ][prefix]message
//! ```
//!
//! where the prefix is written at the start of the line unless
//! [`Flags::MSG_PREFIX`] moves it in front of the message.

use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::panic::Location;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::flags::Flags;

/// A line-oriented writer with a prefix and decoration flags
pub struct LineWriter {
    out: Box<dyn Write + Send>,
    prefix: String,
    flags: Flags,
}

impl LineWriter {
    /// Create a new writer bound to `out`
    pub fn new(out: impl Write + Send + 'static, prefix: impl Into<String>, flags: Flags) -> Self {
        Self {
            out: Box::new(out),
            prefix: prefix.into(),
            flags,
        }
    }

    /// Current line prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replace the line prefix
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Current decoration flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Replace the decoration flags
    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Rebind the destination stream
    pub fn set_output(&mut self, out: impl Write + Send + 'static) {
        self.out = Box::new(out);
    }

    /// Write `message` as one decorated line
    ///
    /// The whole line is handed to the destination in a single `write_all`
    /// call.
    pub fn output(
        &mut self,
        now: DateTime<Utc>,
        caller: &Location<'_>,
        message: &str,
    ) -> io::Result<()> {
        let line = format_line(
            self.flags,
            &self.prefix,
            now,
            caller.file(),
            caller.line(),
            message,
        );
        self.out.write_all(line.as_bytes())?;
        self.out.flush()
    }
}

/// Build a complete line, including the trailing newline
pub fn format_line(
    flags: Flags,
    prefix: &str,
    now: DateTime<Utc>,
    file: &str,
    line: u32,
    message: &str,
) -> String {
    let mut buf = String::with_capacity(prefix.len() + message.len() + 48);
    // Writing into a String cannot fail
    let _ = write_header(&mut buf, flags, prefix, now, file, line);
    buf.push_str(message);
    if !message.ends_with('\n') {
        buf.push('\n');
    }
    buf
}

fn write_header(
    buf: &mut String,
    flags: Flags,
    prefix: &str,
    now: DateTime<Utc>,
    file: &str,
    line: u32,
) -> fmt::Result {
    if !flags.contains(Flags::MSG_PREFIX) {
        buf.push_str(prefix);
    }

    if flags.has_clock() {
        if flags.contains(Flags::UTC) {
            write_clock(buf, flags, &now)?;
        } else {
            write_clock(buf, flags, &now.with_timezone(&Local))?;
        }
    }

    if flags.has_caller() {
        let file = if flags.contains(Flags::SHORT_FILE) {
            short_file(file)
        } else {
            file
        };
        write!(buf, "{}:{}: ", file, line)?;
    }

    if flags.contains(Flags::MSG_PREFIX) {
        buf.push_str(prefix);
    }
    Ok(())
}

fn write_clock<Tz>(buf: &mut String, flags: Flags, t: &DateTime<Tz>) -> fmt::Result
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if flags.contains(Flags::DATE) {
        write!(buf, "{} ", t.format("%Y/%m/%d"))?;
    }
    if flags.has_time() {
        if flags.contains(Flags::MICROSECONDS) {
            write!(buf, "{} ", t.format("%H:%M:%S%.6f"))?;
        } else {
            write!(buf, "{} ", t.format("%H:%M:%S"))?;
        }
    }
    Ok(())
}

/// Final path element of a source file path
fn short_file(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}
