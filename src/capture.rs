//! In-memory line capture
//!
//! A thread-safe ring buffer of emitted lines. Hand a [`CaptureWriter`] to a
//! logger as its destination and read the lines back for display or
//! assertions.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Bounded buffer of the most recent lines
#[derive(Clone)]
pub struct CaptureBuffer {
    inner: Arc<Inner>,
}

struct Inner {
    /// Complete lines, oldest first (capped at max_lines)
    lines: RwLock<VecDeque<String>>,
    /// Bytes of a line whose newline has not arrived yet
    pending: Mutex<Vec<u8>>,
    max_lines: usize,
}

impl CaptureBuffer {
    /// Create a buffer that keeps at most `max_lines` lines
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                lines: RwLock::new(VecDeque::with_capacity(max_lines)),
                pending: Mutex::new(Vec::new()),
                max_lines,
            }),
        }
    }

    /// A writer that appends to this buffer
    pub fn writer(&self) -> CaptureWriter {
        CaptureWriter {
            inner: Arc::clone(&self.inner),
        }
    }

    /// All captured lines without their trailing newline
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lines
            .read()
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Captured lines joined back into the written text
    pub fn contents(&self) -> String {
        self.lines().iter().map(|l| format!("{}\n", l)).collect()
    }

    /// Get the number of captured lines
    pub fn len(&self) -> usize {
        self.inner.lines.read().map(|l| l.len()).unwrap_or(0)
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every captured line
    pub fn clear(&self) {
        if let Ok(mut lines) = self.inner.lines.write() {
            lines.clear();
        }
    }
}

impl Inner {
    fn push_line(&self, line: String) {
        if self.max_lines == 0 {
            return;
        }
        if let Ok(mut lines) = self.lines.write() {
            if lines.len() >= self.max_lines {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }
}

/// Write half of a [`CaptureBuffer`]
pub struct CaptureWriter {
    inner: Arc<Inner>,
}

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut pending = self
            .inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pending.extend_from_slice(buf);

        while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
            let rest = pending.split_off(pos + 1);
            let line = std::mem::replace(&mut *pending, rest);
            let text = String::from_utf8_lossy(&line[..pos]).into_owned();
            self.inner.push_line(text);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
