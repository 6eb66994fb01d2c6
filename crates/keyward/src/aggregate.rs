//! Response aggregation.
//!
//! A single pure fold over the dispatcher's result set. No reordering, no
//! retries: one round of collection is final, so a minority of unreachable
//! nodes stays visible to the administrator instead of being masked.

use keyward_common::PoolResponse;

/// Consolidated outcome of one keyring invocation
#[derive(Debug, Clone)]
pub struct AggregateResult {
    /// Per-pool responses in the order the agent returned them
    pub pools: Vec<PoolResponse>,

    /// Set iff any pool failed to respond or any node reported an error
    pub errored: bool,
}

impl AggregateResult {
    pub fn is_success(&self) -> bool {
        !self.errored
    }
}

/// Fold per-pool responses into the overall verdict
pub fn fold(pools: Vec<PoolResponse>) -> AggregateResult {
    let errored = pools.iter().any(PoolResponse::has_errors);
    AggregateResult { pools, errored }
}
