//! Task definitions — the core data model for scheduled work.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use cadence_core::error::{CadenceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::event_log::EventLog;

/// Everything needed to start a task. Validated by [`TaskSpec::validate`].
#[derive(Debug, Clone)]
pub struct TaskSpec {
    /// Credentials, visited in order on every tick.
    pub credentials: Vec<String>,
    /// Message payloads, consumed cyclically.
    pub messages: Vec<String>,
    /// Identifier of the action target.
    pub target_id: String,
    /// Prepended to every message, separated by a space.
    pub prefix: String,
    /// Pause between ticks. Zero means back-to-back.
    pub interval: Duration,
}

impl TaskSpec {
    pub fn new(credentials: Vec<String>, messages: Vec<String>, target_id: &str) -> Self {
        Self {
            credentials,
            messages,
            target_id: target_id.to_string(),
            prefix: String::new(),
            interval: Duration::from_secs(10),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.credentials.is_empty() {
            return Err(CadenceError::invalid_input("credential list is empty"));
        }
        if self.messages.is_empty() {
            return Err(CadenceError::invalid_input("message list is empty"));
        }
        Ok(())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Running,
    Stopped,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Running => write!(f, "running"),
            TaskState::Stopped => write!(f, "stopped"),
        }
    }
}

/// A running (or stopped) repeating job.
///
/// Inputs are immutable after creation. The worker loop is the only writer of
/// the cursor, the tick counter and both logs; anyone holding the task may
/// request cancellation.
#[derive(Debug)]
pub struct Task {
    id: String,
    credentials: Vec<String>,
    messages: Vec<String>,
    target_id: String,
    prefix: String,
    interval: Duration,
    created_at: DateTime<Utc>,
    stopped: AtomicBool,
    cancel: CancellationToken,
    exited: AtomicBool,
    cursor: AtomicUsize,
    ticks: AtomicU64,
    event_log: EventLog,
    action_log: EventLog,
}

impl Task {
    /// Build a task in the `Running` state. Callers validate `spec` first.
    pub(crate) fn new(id: String, spec: TaskSpec) -> Self {
        Self {
            id,
            credentials: spec.credentials,
            messages: spec.messages,
            target_id: spec.target_id,
            prefix: spec.prefix,
            interval: spec.interval,
            created_at: Utc::now(),
            stopped: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            exited: AtomicBool::new(false),
            cursor: AtomicUsize::new(0),
            ticks: AtomicU64::new(0),
            event_log: EventLog::new(),
            action_log: EventLog::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn credentials(&self) -> &[String] {
        &self.credentials
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Full diagnostic trace: successes, failures, warnings.
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Only the messages that were delivered.
    pub fn action_log(&self) -> &EventLog {
        &self.action_log
    }

    /// Request cancellation. Returns `true` only for the call that flipped the state.
    pub fn cancel(&self) -> bool {
        let first = !self.stopped.swap(true, Ordering::SeqCst);
        self.cancel.cancel();
        first
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> TaskState {
        if self.is_cancelled() {
            TaskState::Stopped
        } else {
            TaskState::Running
        }
    }

    /// Token the worker selects on while suspended.
    pub(crate) fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the worker loop has returned.
    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_exited(&self) {
        self.exited.store(true, Ordering::SeqCst);
    }

    /// Index of the next message to send.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    pub(crate) fn store_cursor(&self, cursor: usize) {
        self.cursor.store(cursor, Ordering::SeqCst);
    }

    /// Completed ticks, including ones that ended in a caught failure.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub(crate) fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    /// `prefix + " " + messages[index % len]`.
    pub fn compose_message(&self, index: usize) -> String {
        let body = &self.messages[index % self.messages.len()];
        format!("{} {}", self.prefix, body)
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary {
            id: self.id.clone(),
            target_id: self.target_id.clone(),
            state: self.state(),
            credentials: self.credentials.len(),
            messages: self.messages.len(),
            interval_secs: self.interval.as_secs(),
            cursor: self.cursor(),
            ticks: self.ticks(),
            event_lines: self.event_log.len(),
            action_lines: self.action_log.len(),
            created_at: self.created_at,
        }
    }
}

/// Read-only view of a task for listings.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub id: String,
    pub target_id: String,
    pub state: TaskState,
    pub credentials: usize,
    pub messages: usize,
    pub interval_secs: u64,
    pub cursor: usize,
    pub ticks: u64,
    pub event_lines: usize,
    pub action_lines: usize,
    pub created_at: DateTime<Utc>,
}

/// Snapshots of both logs of one task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskLogs {
    pub events: Vec<String>,
    pub actions: Vec<String>,
}

impl TaskLogs {
    pub fn of(task: &Task) -> Self {
        Self {
            events: task.event_log().snapshot(),
            actions: task.action_log().snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TaskSpec {
        TaskSpec::new(vec!["c1".into()], vec!["hi".into(), "yo".into()], "P1")
            .with_prefix("[bot]")
            .with_interval(Duration::ZERO)
    }

    #[test]
    fn test_validate() {
        assert!(spec().validate().is_ok());

        let mut no_creds = spec();
        no_creds.credentials.clear();
        assert!(matches!(no_creds.validate(), Err(CadenceError::InvalidInput(_))));

        let mut no_msgs = spec();
        no_msgs.messages.clear();
        assert!(matches!(no_msgs.validate(), Err(CadenceError::InvalidInput(_))));
    }

    #[test]
    fn test_compose_message_cycles() {
        let task = Task::new("abc123".into(), spec());
        assert_eq!(task.compose_message(0), "[bot] hi");
        assert_eq!(task.compose_message(1), "[bot] yo");
        assert_eq!(task.compose_message(2), "[bot] hi");
    }

    #[test]
    fn test_empty_prefix_keeps_separator() {
        let task = Task::new("abc123".into(), spec().with_prefix(""));
        assert_eq!(task.compose_message(0), " hi");
    }

    #[test]
    fn test_cancel_is_one_shot() {
        let task = Task::new("abc123".into(), spec());
        assert_eq!(task.state(), TaskState::Running);
        assert!(task.cancel());
        assert!(!task.cancel());
        assert_eq!(task.state(), TaskState::Stopped);
        assert!(task.cancellation().is_cancelled());
    }

    #[test]
    fn test_summary_reflects_logs() {
        let task = Task::new("abc123".into(), spec());
        task.event_log().append("x");
        task.action_log().append("y");
        task.store_cursor(1);
        let s = task.summary();
        assert_eq!(s.id, "abc123");
        assert_eq!(s.state, TaskState::Running);
        assert_eq!(s.cursor, 1);
        assert_eq!((s.event_lines, s.action_lines), (1, 1));
        assert_eq!(s.interval_secs, 0);
    }
}
