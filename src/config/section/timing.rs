//! `[timing]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [timing]
//! delay_ms = 5000      # Wait before the modal is shown
//! fallback_ms = 100    # Wait before re-checking the style block
//! exit_ms = 400        # Exit animation length before detaching
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delays for the three deferred continuations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Delay between bootstrap and activation, in milliseconds.
    pub delay_ms: u64,
    /// Delay before the style-block fallback check, in milliseconds.
    pub fallback_ms: u64,
    /// Length of the exit animation, in milliseconds.
    pub exit_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            delay_ms: 5000,
            fallback_ms: 100,
            exit_ms: 400,
        }
    }
}

impl TimingConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn fallback(&self) -> Duration {
        Duration::from_millis(self.fallback_ms)
    }

    pub fn exit(&self) -> Duration {
        Duration::from_millis(self.exit_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.exit_ms == 0 {
            diag.error_with_hint(
                FieldPath::new("timing.exit_ms"),
                "exit animation length must be positive",
                "match the duration of the fade-out keyframes (400)",
            );
        }
    }
}
