//! # Cadence Scheduler
//!
//! Runs user-submitted repeating jobs, each on its own Tokio task, until
//! they are explicitly stopped.
//!
//! ## Architecture
//! ```text
//! TaskRegistry (id → Task)
//!   ├── create  → spawn Worker::run
//!   ├── stop    → Task::cancel (one-shot)
//!   └── logs    → EventLog snapshots
//!
//! Worker::run (per task)
//!   └── tick: credential → list sub-targets → perform action (shared cursor)
//!       ├── ✅ / ❌ / ⚠️ lines → event log
//!       ├── delivered messages → action log
//!       └── sleep(interval), cut short by cancellation
//! ```

pub mod engine;
pub mod event_log;
pub mod registry;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use engine::{TickReport, Worker, WorkerSettings};
pub use event_log::EventLog;
pub use registry::TaskRegistry;
pub use tasks::{Task, TaskLogs, TaskSpec, TaskState, TaskSummary};
