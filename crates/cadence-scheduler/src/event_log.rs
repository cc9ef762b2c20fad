//! Append-only, timestamped line logs shared between one worker and many readers.
//!
//! A single `RwLock<Vec<String>>` guards both append and copy, so a reader
//! always sees a prefix of the appended lines and never a torn one.

use std::sync::RwLock;

/// Ordered, append-only sequence of text lines.
#[derive(Debug, Default)]
pub struct EventLog {
    lines: RwLock<Vec<String>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line verbatim.
    pub fn append(&self, line: impl Into<String>) {
        let line = line.into();
        // A poisoned lock still holds a consistent Vec: push is the only mutation.
        let mut lines = self.lines.write().unwrap_or_else(|e| e.into_inner());
        lines.push(line);
    }

    /// Append a line prefixed with the current `[HH:MM:SS]` wall-clock time.
    pub fn append_stamped(&self, line: &str) {
        self.append(stamped(line));
    }

    /// Copy of every line appended so far, in append order.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.lines.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Prefix `line` with the local time, e.g. `[14:03:27] ✅ ...`.
pub fn stamped(line: &str) -> String {
    format!("[{}] {}", chrono::Local::now().format("%H:%M:%S"), line)
}
