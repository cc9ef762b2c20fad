//! Worker loop — drives one task tick by tick until it is cancelled.
//!
//! One tick visits every credential in order, lists its sub-targets and
//! performs one action per sub-target. A single message cursor rotates
//! across all sub-targets of all credentials, so message variety is spread
//! globally rather than reset per credential.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use cadence_core::error::RemoteError;
use cadence_core::traits::RemoteActionClient;
use futures::FutureExt;

use crate::event_log::stamped;
use crate::tasks::Task;

/// Knobs shared by every worker spawned from one registry.
#[derive(Debug, Clone, Copy)]
pub struct WorkerSettings {
    /// Upper bound on a single remote call, on top of the client's own timeout.
    pub call_timeout: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
        }
    }
}

/// Counters for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sub-targets an action was attempted for (cursor advances).
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Sub-targets without a usable sub-credential.
    pub skipped: usize,
    pub list_failures: usize,
    /// The tick stopped early because the task was cancelled.
    pub cancelled: bool,
}

/// Runs a single task. Owns the message cursor.
pub struct Worker {
    task: Arc<Task>,
    client: Arc<dyn RemoteActionClient>,
    settings: WorkerSettings,
    cursor: usize,
}

impl Worker {
    pub fn new(task: Arc<Task>, client: Arc<dyn RemoteActionClient>, settings: WorkerSettings) -> Self {
        let cursor = task.cursor();
        Self {
            task,
            client,
            settings,
            cursor,
        }
    }

    /// Loop until cancellation is observed. Never fails: every error of a tick
    /// ends up in the task's event log.
    pub async fn run(mut self) {
        let id = self.task.id().to_string();
        tracing::info!(
            "🚀 Task {} started: {} credential(s), {} message(s), every {}s via {}",
            id,
            self.task.credentials().len(),
            self.task.messages().len(),
            self.task.interval().as_secs(),
            self.client.name()
        );

        loop {
            if self.task.is_cancelled() {
                break;
            }

            match AssertUnwindSafe(self.tick()).catch_unwind().await {
                Ok(report) => {
                    tracing::debug!("⏱️ Task {} tick: {:?}", id, report);
                }
                Err(panic) => {
                    let reason = panic_message(panic.as_ref());
                    tracing::warn!("⚠️ Task {} tick failed: {}", id, reason);
                    self.task
                        .event_log()
                        .append_stamped(&format!("⚠️ Unexpected failure: {reason}"));
                }
            }
            self.task.record_tick();

            if !self.pause().await {
                break;
            }
        }

        self.task.mark_exited();
        tracing::info!("⛔ Task {} stopped after {} tick(s)", id, self.task.ticks());
    }

    /// One full pass over all credentials and their sub-targets.
    pub async fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let task = self.task.clone();
        let client = self.client.clone();
        let cancel = task.cancellation().clone();

        for (n, credential) in task.credentials().iter().enumerate() {
            let listed = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    report.cancelled = true;
                    return report;
                }
                listed = self.bounded(client.list_sub_targets(credential)) => listed,
            };

            let targets = match listed {
                Ok(targets) => targets,
                Err(e) => {
                    report.list_failures += 1;
                    task.event_log().append_stamped(&format!(
                        "⚠️ Error fetching sub-targets for credential #{}: {e}",
                        n + 1
                    ));
                    continue;
                }
            };

            for target in targets {
                let Some(sub_credential) = target.usable_credential() else {
                    report.skipped += 1;
                    continue;
                };

                let message = task.compose_message(self.cursor);
                let outcome = match self
                    .bounded(async {
                        Ok(client.perform_action(sub_credential, task.target_id(), &message).await)
                    })
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(e) => Err(e.to_string()),
                };

                report.attempted += 1;
                match outcome {
                    Ok(()) => {
                        report.delivered += 1;
                        let line = stamped(&format!("✅ {} ({}) → {}", target.label, target.id, message));
                        task.event_log().append(line);
                        task.action_log().append_stamped(&message);
                    }
                    Err(diagnostic) => {
                        report.failed += 1;
                        task.event_log().append_stamped(&format!(
                            "❌ {} ({}) → {}",
                            target.label, target.id, diagnostic
                        ));
                    }
                }
                self.advance();

                if task.is_cancelled() {
                    report.cancelled = true;
                    return report;
                }
            }
        }

        report
    }

    /// Sleep for the task interval. Returns `false` if cancelled meanwhile.
    async fn pause(&self) -> bool {
        let cancel = self.task.cancellation();
        let interval = self.task.interval();
        if interval.is_zero() {
            tokio::task::yield_now().await;
            return !cancel.is_cancelled();
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(interval) => true,
        }
    }

    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, RemoteError>>,
    ) -> Result<T, RemoteError> {
        let limit = self.settings.call_timeout;
        match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Transport(format!(
                "timed out after {}s",
                limit.as_secs_f64()
            ))),
        }
    }

    fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.task.messages().len();
        self.task.store_cursor(self.cursor);
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
