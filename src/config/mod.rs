//! Modal configuration.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [analytics], [animation], [copy], [timing]
//! ├── types/         # ConfigError, FieldPath, process-wide handle
//! └── mod.rs         # ModalConfig (this file)
//! ```
//!
//! The configuration is immutable once loaded. Every field has a default,
//! so an empty TOML document yields the production setup.
//!
//! # Example
//!
//! ```toml
//! id = "lcs-modal"
//! style_id = "style-lcs-modal"
//! allowed_urls = ["https://abrasuaconta.santander.com.br/landing/conta-select"]
//!
//! [timing]
//! delay_ms = 5000
//! ```

pub mod section;
pub mod types;

pub use section::{AnalyticsConfig, AnimationConfig, CopyConfig, TimingConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::embed::css;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::LazyLock};

/// Tags created in the SVG namespace. Everything else is HTML.
pub const SVG_TAGS: [&str; 9] = [
    "svg", "path", "circle", "rect", "line", "g", "defs", "use", "symbol",
];

/// Landing page the modal is scoped to.
pub const DEFAULT_ALLOWED_URL: &str = "https://abrasuaconta.santander.com.br/landing/conta-select";

/// Valid DOM id: starts with a letter, no whitespace.
static DOM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_:.\-]*$").expect("static regex"));

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    /// Singleton id carried by the modal root.
    pub id: String,

    /// Id of the injected `<style>` block.
    pub style_id: String,

    /// The modal only appears when the location contains one of these.
    pub allowed_urls: Vec<String>,

    /// Style fragments, concatenated in order.
    pub styles: Vec<String>,

    pub timing: TimingConfig,
    pub copy: CopyConfig,
    pub animation: AnimationConfig,
    pub analytics: AnalyticsConfig,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            id: "lcs-modal".into(),
            style_id: "style-lcs-modal".into(),
            allowed_urls: vec![DEFAULT_ALLOWED_URL.into()],
            styles: css::default_fragments(),
            timing: TimingConfig::default(),
            copy: CopyConfig::default(),
            animation: AnimationConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl ModalConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&content)
    }

    /// Whether `tag` is created in the SVG namespace.
    #[inline]
    pub fn is_svg_tag(tag: &str) -> bool {
        SVG_TAGS.contains(&tag)
    }

    /// Validate all fields, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        for (field, value) in [
            (FieldPath::new("id"), &self.id),
            (FieldPath::new("style_id"), &self.style_id),
        ] {
            if !DOM_ID.is_match(value) {
                diag.error_with_hint(
                    field,
                    format!("`{value}` is not a valid element id"),
                    "start with a letter and avoid whitespace",
                );
            }
        }
        if self.id == self.style_id {
            diag.error(
                FieldPath::new("style_id"),
                "must differ from `id`, both are looked up by id",
            );
        }

        if self.allowed_urls.is_empty() {
            diag.error_with_hint(
                FieldPath::new("allowed_urls"),
                "no allowed location, the modal could never appear",
                format!("add \"{DEFAULT_ALLOWED_URL}\""),
            );
        } else if self.allowed_urls.iter().any(String::is_empty) {
            diag.error(
                FieldPath::new("allowed_urls"),
                "empty entry would match every location",
            );
        }

        if self.styles.iter().all(|s| s.trim().is_empty()) {
            diag.error(FieldPath::new("styles"), "at least one style fragment is required");
        }

        self.timing.validate(&mut diag);
        self.animation.validate(&mut diag);
        self.analytics.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = ModalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.id, "lcs-modal");
        assert_eq!(config.style_id, "style-lcs-modal");
        assert_eq!(config.styles.len(), 3);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = ModalConfig::from_toml_str("").unwrap();
        assert_eq!(config.allowed_urls, vec![DEFAULT_ALLOWED_URL.to_string()]);
        assert_eq!(config.timing.delay_ms, 5000);
    }

    #[test]
    fn test_partial_override() {
        let config = ModalConfig::from_toml_str(
            r#"
            allowed_urls = ["http://127.0.0.1:5500/index.html"]

            [timing]
            delay_ms = 10

            [copy]
            title = "Outro título"
            "#,
        )
        .unwrap();
        assert_eq!(config.timing.delay_ms, 10);
        assert_eq!(config.timing.exit_ms, 400);
        assert_eq!(config.copy.title, "Outro título");
        assert_eq!(config.copy.button, "Explorar benefícios");
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let result = ModalConfig::from_toml_str(
            r#"
            id = "bad id"
            allowed_urls = []
            [analytics]
            event = ""
            "#,
        );
        let Err(ConfigError::Diagnostics(diag)) = result else {
            panic!("expected diagnostics");
        };
        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"id"));
        assert!(fields.contains(&"allowed_urls"));
        assert!(fields.contains(&"analytics.event"));
    }

    #[test]
    fn test_same_ids_rejected() {
        let mut config = ModalConfig::default();
        config.style_id = config.id.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let result = ModalConfig::from_toml_str("id = [");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "style_id = \"style-promo\"").unwrap();
        let config = ModalConfig::from_path(file.path()).unwrap();
        assert_eq!(config.style_id, "style-promo");

        let missing = ModalConfig::from_path(Path::new("/nonexistent/modal.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(..))));
    }

    #[test]
    fn test_svg_tags() {
        assert!(ModalConfig::is_svg_tag("svg"));
        assert!(ModalConfig::is_svg_tag("path"));
        assert!(!ModalConfig::is_svg_tag("div"));
        assert!(!ModalConfig::is_svg_tag("SVG"));
    }
}
