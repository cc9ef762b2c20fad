//! The seam between the scheduler and the remote service.

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::types::{ActionOutcome, SubTarget};

/// Remote service client used by every task's worker loop.
///
/// Implementations must bound each call with a network timeout; the loop
/// treats a hung call as the residual cancellation latency.
#[async_trait]
pub trait RemoteActionClient: Send + Sync {
    /// Enumerate the sub-targets reachable with `credential`.
    async fn list_sub_targets(&self, credential: &str) -> Result<Vec<SubTarget>, RemoteError>;

    /// Perform one action on `target_id` on behalf of a sub-target.
    ///
    /// `Err` carries the diagnostic text to record in the event log.
    async fn perform_action(
        &self,
        sub_credential: &str,
        target_id: &str,
        message: &str,
    ) -> ActionOutcome;

    /// Short name used in process logs.
    fn name(&self) -> &str {
        "remote"
    }
}
