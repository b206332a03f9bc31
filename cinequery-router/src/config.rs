//! Configuration for the orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cinequery_core::{CineError, Result};

use crate::merge::MergePolicy;

/// Tunables for one [`Orchestrator`](crate::Orchestrator).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    /// Budget for the classification step; on expiry the query routes both
    /// ways with confidence zero.
    pub classify_timeout: Duration,
    /// Budget for each adapter invocation.
    pub adapter_timeout: Duration,
    /// Overall per-query budget. When it runs out mid-fan-out, the
    /// orchestrator proceeds with whatever responses it has and marks the
    /// result degraded.
    pub query_deadline: Duration,
    /// Maximum items requested from each backend.
    pub top_k: usize,
    /// How cross-source title matches are handled during the merge.
    pub merge_policy: MergePolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            classify_timeout: Duration::from_secs(3),
            adapter_timeout: Duration::from_secs(10),
            query_deadline: Duration::from_secs(20),
            top_k: 5,
            merge_policy: MergePolicy::CombineByTitle,
        }
    }
}

impl RouterConfig {
    /// Create a new builder for constructing a [`RouterConfig`].
    pub fn builder() -> RouterConfigBuilder {
        RouterConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RouterConfig`].
#[derive(Debug, Clone, Default)]
pub struct RouterConfigBuilder {
    config: RouterConfig,
}

impl RouterConfigBuilder {
    /// Set the classification budget.
    pub fn classify_timeout(mut self, timeout: Duration) -> Self {
        self.config.classify_timeout = timeout;
        self
    }

    /// Set the per-adapter invocation budget.
    pub fn adapter_timeout(mut self, timeout: Duration) -> Self {
        self.config.adapter_timeout = timeout;
        self
    }

    /// Set the overall per-query budget.
    pub fn query_deadline(mut self, deadline: Duration) -> Self {
        self.config.query_deadline = deadline;
        self
    }

    /// Set the maximum items requested from each backend.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the cross-source merge policy.
    pub fn merge_policy(mut self, policy: MergePolicy) -> Self {
        self.config.merge_policy = policy;
        self
    }

    /// Build the [`RouterConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::Config`] if:
    /// - `top_k == 0`
    /// - any timeout or the deadline is zero
    pub fn build(self) -> Result<RouterConfig> {
        if self.config.top_k == 0 {
            return Err(CineError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.classify_timeout.is_zero()
            || self.config.adapter_timeout.is_zero()
            || self.config.query_deadline.is_zero()
        {
            return Err(CineError::Config(
                "timeouts and the query deadline must be non-zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_top_k_is_rejected() {
        let err = RouterConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, CineError::Config(_)));
    }

    #[test]
    fn defaults_build_cleanly() {
        let config = RouterConfig::builder().build().unwrap();
        assert_eq!(config, RouterConfig::default());
    }
}
