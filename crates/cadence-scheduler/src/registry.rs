//! Task registry — creates, looks up and cancels tasks by id.
//!
//! One registry is built at process start and handed to the HTTP layer.
//! Entries are never removed; stopped tasks stay readable until exit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use cadence_core::error::{CadenceError, Result};
use cadence_core::traits::RemoteActionClient;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::task::JoinHandle;

use crate::engine::{Worker, WorkerSettings};
use crate::tasks::{Task, TaskLogs, TaskSpec, TaskSummary};

/// Length of generated task ids (alphabet: `[A-Za-z0-9]`).
pub const TASK_ID_LEN: usize = 6;

struct Entry {
    task: Arc<Task>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Process-wide map from task id to task.
pub struct TaskRegistry {
    tasks: RwLock<HashMap<String, Entry>>,
    client: Arc<dyn RemoteActionClient>,
    settings: WorkerSettings,
}

impl TaskRegistry {
    pub fn new(client: Arc<dyn RemoteActionClient>) -> Self {
        Self::with_settings(client, WorkerSettings::default())
    }

    pub fn with_settings(client: Arc<dyn RemoteActionClient>, settings: WorkerSettings) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            client,
            settings,
        }
    }

    /// Validate `spec`, register a new task and start its worker.
    ///
    /// Returns the task id without waiting for the first tick. Must be
    /// called from within a Tokio runtime.
    pub fn create(&self, spec: TaskSpec) -> Result<String> {
        spec.validate()?;

        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        let id = loop {
            let candidate = generate_id(TASK_ID_LEN);
            if !tasks.contains_key(&candidate) {
                break candidate;
            }
        };

        let task = Arc::new(Task::new(id.clone(), spec));
        let worker = Worker::new(task.clone(), self.client.clone(), self.settings);
        let handle = tokio::spawn(worker.run());
        tasks.insert(
            id.clone(),
            Entry {
                task,
                worker: Mutex::new(Some(handle)),
            },
        );

        tracing::info!("📅 Task registered: {} ({} total)", id, tasks.len());
        Ok(id)
    }

    /// Shared handle to a task.
    pub fn get(&self, id: &str) -> Result<Arc<Task>> {
        let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());
        tasks
            .get(id)
            .map(|entry| entry.task.clone())
            .ok_or_else(|| CadenceError::not_found(id))
    }

    /// Signal cancellation. Idempotent; does not wait for the worker.
    pub fn stop(&self, id: &str) -> Result<()> {
        let task = self.get(id)?;
        if task.cancel() {
            tracing::info!("🛑 Stop requested for task {}", id);
        }
        Ok(())
    }

    /// Snapshots of the event log and the action log.
    pub fn logs(&self, id: &str) -> Result<TaskLogs> {
        let task = self.get(id)?;
        Ok(TaskLogs::of(&task))
    }

    /// All tasks, oldest first.
    pub fn list(&self) -> Vec<TaskSummary> {
        let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());
        let mut summaries: Vec<TaskSummary> = tasks.values().map(|e| e.task.summary()).collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    pub fn len(&self) -> usize {
        self.tasks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cancel every running task. Returns how many were still running.
    pub fn stop_all(&self) -> usize {
        let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());
        let stopped = tasks.values().filter(|e| e.task.cancel()).count();
        if stopped > 0 {
            tracing::info!("🛑 Stopped {} running task(s)", stopped);
        }
        stopped
    }

    /// Cancel everything and wait up to `grace` for the workers to exit.
    ///
    /// Returns `true` when every worker finished in time.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.stop_all();

        let handles: Vec<JoinHandle<()>> = {
            let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());
            tasks
                .values()
                .filter_map(|e| e.worker.lock().unwrap_or_else(|p| p.into_inner()).take())
                .collect()
        };

        let count = handles.len();
        match tokio::time::timeout(grace, futures::future::join_all(handles)).await {
            Ok(_) => {
                tracing::info!("✅ {} worker(s) drained", count);
                true
            }
            Err(_) => {
                tracing::warn!("⚠️ Workers still busy after {}s, abandoning", grace.as_secs());
                false
            }
        }
    }
}

/// Random id over `[A-Za-z0-9]`.
pub fn generate_id(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
