//! Search policy.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::strategy::Strategy;

/// Strategy selection plus strategy-specific limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPolicy {
    pub strategy: Strategy,
    /// Highest depth bound iterative deepening may reach before the run
    /// terminates as exhausted. `None` lets the bound grow until the caller
    /// cancels or the reachable graph is fully explored.
    #[serde(default)]
    pub max_depth_bound: Option<u32>,
}

impl SearchPolicy {
    /// Policy for `strategy` with no limits.
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            max_depth_bound: None,
        }
    }

    /// Set the iterative-deepening bound cap.
    #[must_use]
    pub fn with_max_depth_bound(mut self, bound: u32) -> Self {
        self.max_depth_bound = Some(bound);
        self
    }

    /// Validate that the options fit the strategy.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedPolicy`] if `max_depth_bound` is set
    /// for a strategy other than iterative deepening.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_depth_bound.is_some() && self.strategy != Strategy::IterativeDeepening {
            return Err(SearchError::UnsupportedPolicy {
                detail: format!(
                    "max_depth_bound only applies to iterativedeepening, not {}",
                    self.strategy
                ),
            });
        }
        Ok(())
    }
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}
