//! Leveled logger
//!
//! Wraps a [`LineWriter`] with a minimum level. Every call that passes the
//! level gate sets the writer prefix to the level name and writes one line,
//! both under the same lock, so concurrent callers never see a line carrying
//! another caller's prefix.

use std::fmt::{self, Display};
use std::io::{self, Write};
use std::panic::Location;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::flags::Flags;
use crate::level::Level;
use crate::writer::LineWriter;

/// Exit status used after a fatal line
pub const FATAL_EXIT_CODE: i32 = 1;

/// What happens after a fatal or panic line has been written
///
/// The default, [`ProcessTerminate`], exits the process on fatal lines. Tests
/// can install a handler that unwinds with a recognisable payload instead.
pub trait Terminate: Send + Sync {
    /// Called after a fatal line
    fn exit(&self, code: i32) -> !;

    /// Called after a panic line, right before the logger panics with the
    /// message at the caller's location
    fn raise(&self, message: &str) {
        let _ = message;
    }
}

/// Exits the process on fatal lines
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTerminate;

impl Terminate for ProcessTerminate {
    fn exit(&self, code: i32) -> ! {
        std::process::exit(code)
    }
}

/// A logger that filters by level and prefixes each line with the level name
pub struct Logger {
    writer: Mutex<LineWriter>,
    level: AtomicU8,
    terminate: Box<dyn Terminate>,
}

impl Logger {
    /// Create a logger writing to `out` with the given decoration flags
    ///
    /// The initial level is always [`Level::Info`].
    pub fn new(out: impl Write + Send + 'static, flags: Flags) -> Self {
        Self {
            writer: Mutex::new(LineWriter::new(out, "", flags)),
            level: AtomicU8::new(Level::Info.rank()),
            terminate: Box::new(ProcessTerminate),
        }
    }

    /// Create a logger writing to standard error
    pub fn stderr(flags: Flags) -> Self {
        Self::new(io::stderr(), flags)
    }

    /// Replace the handler invoked after fatal and panic lines
    pub fn with_terminate(mut self, terminate: impl Terminate + 'static) -> Self {
        self.terminate = Box::new(terminate);
        self
    }

    /// Current minimum level
    pub fn level(&self) -> Level {
        Level::from_rank(self.level.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Set the lowest level that is written
    pub fn set_level(&self, level: Level) {
        self.level.store(level.rank(), Ordering::Relaxed);
    }

    /// Current decoration flags of the underlying writer
    pub fn flags(&self) -> Flags {
        self.lock_writer().flags()
    }

    /// Replace the decoration flags of the underlying writer
    pub fn set_flags(&self, flags: Flags) {
        self.lock_writer().set_flags(flags);
    }

    /// Rebind the destination stream
    pub fn set_output(&self, out: impl Write + Send + 'static) {
        self.lock_writer().set_output(out);
    }

    /// Whether a line at `level` would be written
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }

    fn lock_writer(&self) -> MutexGuard<'_, LineWriter> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `message` at `level` if it passes the level gate
    ///
    /// Returns the rendered message when a line was written.
    #[track_caller]
    fn log(&self, level: Level, message: &dyn Display) -> Option<String> {
        if !self.enabled(level) {
            return None;
        }
        let caller = Location::caller();
        let message = message.to_string();

        let mut writer = self.lock_writer();
        writer.set_prefix(format!("{} ", level));
        if let Err(e) = writer.output(Utc::now(), caller, &message) {
            tracing::debug!("Dropped {} line: {}", level.as_str().trim_end(), e);
        }
        Some(message)
    }

    /// Log at [`Level::Debug`]
    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.log(Level::Debug, &message);
    }

    /// Log formatted arguments at [`Level::Debug`]
    #[track_caller]
    pub fn debugf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, &args);
    }

    /// Log at [`Level::Info`]
    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.log(Level::Info, &message);
    }

    /// Log formatted arguments at [`Level::Info`]
    #[track_caller]
    pub fn infof(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, &args);
    }

    /// Log at [`Level::Warn`]
    #[track_caller]
    pub fn warn(&self, message: impl Display) {
        self.log(Level::Warn, &message);
    }

    /// Log formatted arguments at [`Level::Warn`]
    #[track_caller]
    pub fn warnf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, &args);
    }

    /// Log at [`Level::Error`]
    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.log(Level::Error, &message);
    }

    /// Log formatted arguments at [`Level::Error`]
    #[track_caller]
    pub fn errorf(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, &args);
    }

    /// Log at [`Level::Fatal`], then exit with [`FATAL_EXIT_CODE`]
    ///
    /// Nothing happens when the fatal level is filtered out.
    #[track_caller]
    pub fn fatal(&self, message: impl Display) {
        if self.log(Level::Fatal, &message).is_some() {
            self.terminate.exit(FATAL_EXIT_CODE);
        }
    }

    /// Log formatted arguments at [`Level::Fatal`], then exit
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) {
        if self.log(Level::Fatal, &args).is_some() {
            self.terminate.exit(FATAL_EXIT_CODE);
        }
    }

    /// Log at [`Level::Panic`], then panic with the message
    ///
    /// Nothing happens when the panic level is filtered out.
    #[track_caller]
    pub fn panic(&self, message: impl Display) {
        if let Some(message) = self.log(Level::Panic, &message) {
            self.terminate.raise(&message);
            std::panic::panic_any(message);
        }
    }

    /// Log formatted arguments at [`Level::Panic`], then panic
    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) {
        if let Some(message) = self.log(Level::Panic, &args) {
            self.terminate.raise(&message);
            std::panic::panic_any(message);
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("flags", &self.flags())
            .finish_non_exhaustive()
    }
}

/// Leveled logging through any logger
///
/// Lets code accept `&dyn Log` instead of a concrete [`Logger`]. Messages are
/// taken as `&dyn Display` so the trait stays object safe.
pub trait Log: Send + Sync {
    /// Set the lowest level that is written
    fn set_level(&self, level: Level);

    /// Replace the decoration flags
    fn set_flags(&self, flags: Flags);

    fn debug(&self, message: &dyn Display);
    fn debugf(&self, args: fmt::Arguments<'_>);
    fn info(&self, message: &dyn Display);
    fn infof(&self, args: fmt::Arguments<'_>);
    fn warn(&self, message: &dyn Display);
    fn warnf(&self, args: fmt::Arguments<'_>);
    fn error(&self, message: &dyn Display);
    fn errorf(&self, args: fmt::Arguments<'_>);

    /// Log at [`Level::Fatal`], then exit
    fn fatal(&self, message: &dyn Display);
    fn fatalf(&self, args: fmt::Arguments<'_>);

    /// Log at [`Level::Panic`], then panic with the message
    fn panic(&self, message: &dyn Display);
    fn panicf(&self, args: fmt::Arguments<'_>);
}

impl Log for Logger {
    fn set_level(&self, level: Level) {
        Logger::set_level(self, level);
    }

    fn set_flags(&self, flags: Flags) {
        Logger::set_flags(self, flags);
    }

    #[track_caller]
    fn debug(&self, message: &dyn Display) {
        Logger::debug(self, message);
    }

    #[track_caller]
    fn debugf(&self, args: fmt::Arguments<'_>) {
        Logger::debugf(self, args);
    }

    #[track_caller]
    fn info(&self, message: &dyn Display) {
        Logger::info(self, message);
    }

    #[track_caller]
    fn infof(&self, args: fmt::Arguments<'_>) {
        Logger::infof(self, args);
    }

    #[track_caller]
    fn warn(&self, message: &dyn Display) {
        Logger::warn(self, message);
    }

    #[track_caller]
    fn warnf(&self, args: fmt::Arguments<'_>) {
        Logger::warnf(self, args);
    }

    #[track_caller]
    fn error(&self, message: &dyn Display) {
        Logger::error(self, message);
    }

    #[track_caller]
    fn errorf(&self, args: fmt::Arguments<'_>) {
        Logger::errorf(self, args);
    }

    #[track_caller]
    fn fatal(&self, message: &dyn Display) {
        Logger::fatal(self, message);
    }

    #[track_caller]
    fn fatalf(&self, args: fmt::Arguments<'_>) {
        Logger::fatalf(self, args);
    }

    #[track_caller]
    fn panic(&self, message: &dyn Display) {
        Logger::panic(self, message);
    }

    #[track_caller]
    fn panicf(&self, args: fmt::Arguments<'_>) {
        Logger::panicf(self, args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureBuffer;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;

    /// Unwinds instead of ending the test process
    struct Unwind;

    #[derive(Debug, PartialEq)]
    struct Exited(i32);

    impl Terminate for Unwind {
        fn exit(&self, code: i32) -> ! {
            std::panic::panic_any(Exited(code))
        }
    }

    fn capture_logger(flags: Flags) -> (Logger, CaptureBuffer) {
        let capture = CaptureBuffer::new(100);
        let logger = Logger::new(capture.writer(), flags).with_terminate(Unwind);
        (logger, capture)
    }

    #[test]
    fn test_default_level_is_info() {
        let (logger, capture) = capture_logger(Flags::empty());
        assert_eq!(logger.level(), Level::Info);

        logger.debug("hidden");
        logger.info("shown");

        assert_eq!(capture.lines(), vec!["INFO  shown"]);
    }

    #[test]
    fn test_level_gate_for_every_pair() {
        for threshold in Level::ALL {
            for level in [Level::Debug, Level::Info, Level::Warn, Level::Error] {
                let (logger, capture) = capture_logger(Flags::empty());
                logger.set_level(threshold);
                match level {
                    Level::Debug => logger.debug("m"),
                    Level::Info => logger.info("m"),
                    Level::Warn => logger.warn("m"),
                    _ => logger.error("m"),
                }
                assert_eq!(
                    capture.len(),
                    usize::from(level >= threshold),
                    "{:?} at threshold {:?}",
                    level,
                    threshold
                );
            }
        }
    }

    #[test]
    fn test_warn_threshold_end_to_end() {
        let (logger, capture) = capture_logger(Flags::empty());
        logger.set_level(Level::Warn);

        logger.debug("a");
        logger.info("b");
        logger.warn("c");
        logger.error("d");

        assert_eq!(capture.lines(), vec!["WARN  c", "ERROR d"]);
    }

    #[test]
    fn test_formatted_matches_plain() {
        let (logger, capture) = capture_logger(Flags::empty());
        let n = 3;

        logger.infof(format_args!("{} files in {:>4}ms", n, 12));
        logger.info(format!("{} files in {:>4}ms", n, 12));
        logger.warnf(format_args!("x={x}", x = 1.5));
        logger.warn("x=1.5");
        logger.errorf(format_args!("{:?}", "q"));
        logger.error("\"q\"");
        logger.set_level(Level::Debug);
        logger.debugf(format_args!("{}", 'c'));
        logger.debug('c');

        let lines = capture.lines();
        assert_eq!(lines.len(), 8);
        for pair in lines.chunks(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_set_flags_replaces_decoration() {
        let (logger, capture) = capture_logger(Flags::STD);
        logger.set_flags(Flags::SHORT_FILE | Flags::LONG_FILE | Flags::MSG_PREFIX);
        assert_eq!(logger.flags(), Flags::SHORT_FILE | Flags::LONG_FILE | Flags::MSG_PREFIX);

        let line = line!() + 1;
        logger.info("located");

        assert_eq!(
            capture.lines(),
            vec![format!("logger.rs:{}: INFO  located", line)]
        );
    }

    #[test]
    fn test_flags_reflected_in_output() {
        let (logger, capture) = capture_logger(Flags::empty());
        logger.set_flags(Flags::DATE | Flags::UTC);
        logger.warn("dated");

        let line = &capture.lines()[0];
        // WARN  YYYY/MM/DD dated
        assert!(line.starts_with("WARN  "));
        assert!(line.ends_with(" dated"));
        assert_eq!(line.len(), "WARN  ".len() + 11 + "dated".len());
    }

    #[test]
    fn test_sprint_message() {
        let (logger, capture) = capture_logger(Flags::empty());
        logger.info(crate::sprint!("retrying in ", 5, 's'));
        assert_eq!(capture.lines(), vec!["INFO  retrying in 5 s"]);
    }

    #[test]
    fn test_fatal_writes_then_exits() {
        let (logger, capture) = capture_logger(Flags::empty());

        let result = catch_unwind(AssertUnwindSafe(|| logger.fatal("disk gone")));
        let payload = result.unwrap_err();

        assert_eq!(payload.downcast_ref::<Exited>(), Some(&Exited(FATAL_EXIT_CODE)));
        assert_eq!(capture.lines(), vec!["FATAL disk gone"]);
    }

    #[test]
    fn test_fatalf_writes_then_exits() {
        let (logger, capture) = capture_logger(Flags::empty());

        let result = catch_unwind(AssertUnwindSafe(|| logger.fatalf(format_args!("code {}", 7))));

        assert!(result.unwrap_err().downcast_ref::<Exited>().is_some());
        assert_eq!(capture.lines(), vec!["FATAL code 7"]);
    }

    #[test]
    fn test_panic_writes_then_raises() {
        let (logger, capture) = capture_logger(Flags::empty());

        let result = catch_unwind(AssertUnwindSafe(|| logger.panicf(format_args!("bad {}", "state"))));
        let payload = result.unwrap_err();

        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("bad state"));
        assert_eq!(capture.lines(), vec!["PANIC bad state"]);

        // The writer lock is released before unwinding
        logger.info("still usable");
        assert_eq!(capture.len(), 2);
    }

    #[test]
    fn test_raise_hook_sees_message_before_panic() {
        struct Record(Arc<Mutex<Vec<String>>>);

        impl Terminate for Record {
            fn exit(&self, code: i32) -> ! {
                std::panic::panic_any(Exited(code))
            }

            fn raise(&self, message: &str) {
                self.0
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(message.to_string());
            }
        }

        let raised = Arc::new(Mutex::new(Vec::new()));
        let capture = CaptureBuffer::new(10);
        let logger = Logger::new(capture.writer(), Flags::empty())
            .with_terminate(Record(Arc::clone(&raised)));

        let result = catch_unwind(AssertUnwindSafe(|| logger.panic("out of range")));
        let payload = result.unwrap_err();

        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("out of range"));
        assert_eq!(*raised.lock().unwrap(), vec!["out of range"]);
        assert_eq!(capture.lines(), vec!["PANIC out of range"]);
    }

    #[test]
    fn test_filtered_fatal_does_not_exit() {
        let (logger, capture) = capture_logger(Flags::empty());
        logger.set_level(Level::Panic);

        logger.fatal("ignored");
        logger.fatalf(format_args!("ignored"));

        assert!(capture.is_empty());
    }

    #[test]
    fn test_set_output_rebinds() {
        let (logger, first) = capture_logger(Flags::empty());
        let second = CaptureBuffer::new(10);

        logger.info("one");
        logger.set_output(second.writer());
        logger.info("two");

        assert_eq!(first.lines(), vec!["INFO  one"]);
        assert_eq!(second.lines(), vec!["INFO  two"]);
    }

    fn drive(log: &dyn Log) {
        log.set_level(Level::Warn);
        log.debug(&"a");
        log.info(&"b");
        log.warn(&"c");
        log.errorf(format_args!("{}", 'd'));
        log.set_flags(Flags::MSG_PREFIX);
        log.error(&42);
    }

    #[test]
    fn test_logger_through_dyn_log() {
        let (logger, capture) = capture_logger(Flags::empty());

        drive(&logger);

        assert_eq!(capture.lines(), vec!["WARN  c", "ERROR d", "ERROR 42"]);
        assert_eq!(logger.level(), Level::Warn);
        assert_eq!(logger.flags(), Flags::MSG_PREFIX);
    }

    #[test]
    fn test_dyn_log_fatal_and_panic() {
        let (logger, capture) = capture_logger(Flags::empty());
        let log: &dyn Log = &logger;

        let exited = catch_unwind(AssertUnwindSafe(|| log.fatalf(format_args!("f{}", 1))));
        assert!(exited.unwrap_err().downcast_ref::<Exited>().is_some());

        let panicked = catch_unwind(AssertUnwindSafe(|| log.panic(&"p")));
        assert_eq!(
            panicked.unwrap_err().downcast_ref::<String>().map(String::as_str),
            Some("p")
        );

        assert_eq!(capture.lines(), vec!["FATAL f1", "PANIC p"]);
    }

    #[test]
    fn test_concurrent_lines_keep_their_prefix() {
        let (logger, capture) = capture_logger(Flags::empty());
        let logger = Arc::new(logger);
        logger.set_level(Level::Debug);

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        match t % 4 {
                            0 => logger.debug("debug"),
                            1 => logger.info("info"),
                            2 => logger.warn("warn"),
                            _ => logger.errorf(format_args!("error {}", i)),
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = capture.lines();
        assert_eq!(lines.len(), 100);
        for line in lines {
            let (prefix, message) = line.split_at(6);
            let expected = message.split(' ').next().unwrap().to_uppercase();
            assert_eq!(prefix.trim_end(), expected);
        }
    }
}
