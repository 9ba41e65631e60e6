//! Process-wide configuration handle.
//!
//! The configuration is created once at load and never mutated afterwards,
//! so a `OnceLock` is enough: the first `init_config` call wins.

use crate::config::ModalConfig;
use std::sync::{Arc, LazyLock, OnceLock};

static CONFIG: OnceLock<Arc<ModalConfig>> = OnceLock::new();

static DEFAULT: LazyLock<Arc<ModalConfig>> = LazyLock::new(|| Arc::new(ModalConfig::default()));

/// Current configuration, or the built-in defaults when none was installed.
#[inline]
pub fn cfg() -> Arc<ModalConfig> {
    CONFIG
        .get()
        .map(Arc::clone)
        .unwrap_or_else(|| Arc::clone(&DEFAULT))
}

/// Install the process-wide configuration.
///
/// Returns the installed handle. If a configuration was already installed it
/// is kept and returned unchanged.
#[inline]
pub fn init_config(config: ModalConfig) -> Arc<ModalConfig> {
    Arc::clone(CONFIG.get_or_init(|| Arc::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfg_is_stable_across_calls() {
        let first = cfg();
        let second = cfg();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_init_config_first_call_wins() {
        let installed = init_config(ModalConfig::default());
        let mut other = ModalConfig::default();
        other.id = "another-modal".into();
        let again = init_config(other);
        assert!(Arc::ptr_eq(&installed, &again));
        assert_eq!(cfg().id, installed.id);
    }
}
