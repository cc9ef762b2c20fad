//! In-memory remote client for scheduler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::error::RemoteError;
use cadence_core::traits::RemoteActionClient;
use cadence_core::types::{ActionOutcome, SubTarget};

use crate::tasks::Task;

/// One recorded `perform_action` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub sub_credential: String,
    pub target_id: String,
    pub message: String,
}

#[derive(Default)]
pub struct ScriptedClient {
    listings: HashMap<String, Result<Vec<SubTarget>, RemoteError>>,
    fail_with: Option<String>,
    panic_on_list: Option<String>,
    action_delay: Option<Duration>,
    cancel_after_first_action: Mutex<Option<Arc<Task>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets(mut self, credential: &str, targets: Vec<SubTarget>) -> Self {
        self.listings.insert(credential.to_string(), Ok(targets));
        self
    }

    pub fn with_list_error(mut self, credential: &str, error: RemoteError) -> Self {
        self.listings.insert(credential.to_string(), Err(error));
        self
    }

    pub fn failing_actions(mut self, diagnostic: &str) -> Self {
        self.fail_with = Some(diagnostic.to_string());
        self
    }

    pub fn panicking_on(mut self, credential: &str) -> Self {
        self.panic_on_list = Some(credential.to_string());
        self
    }

    pub fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = Some(delay);
        self
    }

    /// Cancel `task` from inside the first `perform_action` call.
    pub fn cancel_during_first_action(&self, task: Arc<Task>) {
        *self.cancel_after_first_action.lock().unwrap() = Some(task);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.message).collect()
    }
}

#[async_trait]
impl RemoteActionClient for ScriptedClient {
    async fn list_sub_targets(&self, credential: &str) -> Result<Vec<SubTarget>, RemoteError> {
        if self.panic_on_list.as_deref() == Some(credential) {
            panic!("listing exploded for {credential}");
        }
        match self.listings.get(credential) {
            Some(result) => result.clone(),
            None => Ok(Vec::new()),
        }
    }

    async fn perform_action(&self, sub_credential: &str, target_id: &str, message: &str) -> ActionOutcome {
        if let Some(delay) = self.action_delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(Call {
            sub_credential: sub_credential.to_string(),
            target_id: target_id.to_string(),
            message: message.to_string(),
        });
        if let Some(task) = self.cancel_after_first_action.lock().unwrap().take() {
            task.cancel();
        }
        match &self.fail_with {
            Some(diagnostic) => Err(diagnostic.clone()),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
