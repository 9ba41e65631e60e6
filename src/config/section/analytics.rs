//! `[analytics]` section configuration.
//!
//! Close and CTA records share `event`, `action` and `category`; only the
//! label differs.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub event: String,
    pub action: String,
    pub category: String,
    /// Label pushed when the close control is used.
    pub close_label: String,
    /// Label pushed when the call-to-action control is used.
    pub cta_label: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            event: "eventGA".into(),
            action: "clicou".into(),
            category: "abrasuaconta:select".into(),
            close_label: "modal:fechar".into(),
            cta_label: "modal:cta".into(),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let fields = [
            (FieldPath::new("analytics.event"), &self.event),
            (FieldPath::new("analytics.action"), &self.action),
            (FieldPath::new("analytics.category"), &self.category),
            (FieldPath::new("analytics.close_label"), &self.close_label),
            (FieldPath::new("analytics.cta_label"), &self.cta_label),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                diag.error(field, "must not be empty");
            }
        }
        if self.close_label == self.cta_label && !self.close_label.is_empty() {
            diag.error_with_hint(
                FieldPath::new("analytics.cta_label"),
                "close and CTA records would be indistinguishable",
                "use distinct labels such as `modal:fechar` and `modal:cta`",
            );
        }
    }
}
