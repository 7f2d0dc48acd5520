//! Engine configuration.
//!
//! Game rules live in [`GameMode`](crate::rules::GameMode); this covers how
//! the orchestrator runs: seeding, grace window, staging and persistence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Orchestrator configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,

    /// Grace window before a winning, non-maximal selection auto-commits.
    /// `None` disables the timer; callers commit with `commit_selection`.
    pub grace_period_ms: Option<u64>,

    /// Pause between staged frames. Zero publishes frames back to back.
    pub stage_delay_ms: u64,

    /// Write committed snapshots to the store.
    pub persist: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            grace_period_ms: Some(600),
            stage_delay_ms: 0,
            persist: true,
        }
    }
}

impl EngineConfig {
    /// Set a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set or disable the grace window.
    #[must_use]
    pub fn with_grace_period(mut self, millis: Option<u64>) -> Self {
        self.grace_period_ms = millis;
        self
    }

    /// Set the pause between staged frames.
    #[must_use]
    pub fn with_stage_delay(mut self, millis: u64) -> Self {
        self.stage_delay_ms = millis;
        self
    }

    /// Enable or disable persistence.
    #[must_use]
    pub fn with_persistence(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    #[must_use]
    pub fn grace_period(&self) -> Option<Duration> {
        self.grace_period_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn stage_delay(&self) -> Duration {
        Duration::from_millis(self.stage_delay_ms)
    }
}
