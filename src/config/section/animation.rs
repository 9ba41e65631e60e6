//! `[animation]` section configuration.
//!
//! Entrance classes are set when the modal is assembled; closing swaps each
//! one for its exit counterpart.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Overlay entrance class.
    pub overlay_enter: String,
    /// Overlay exit class.
    pub overlay_exit: String,
    /// Container entrance class.
    pub container_enter: String,
    /// Container exit class.
    pub container_exit: String,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            overlay_enter: "fadeIn".into(),
            overlay_exit: "fadeOut".into(),
            container_enter: "moveDown".into(),
            container_exit: "moveUp".into(),
        }
    }
}

impl AnimationConfig {
    /// `(entrance, exit)` class pairs in overlay, container order.
    pub fn swaps(&self) -> [(&str, &str); 2] {
        [
            (self.overlay_enter.as_str(), self.overlay_exit.as_str()),
            (self.container_enter.as_str(), self.container_exit.as_str()),
        ]
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let fields = [
            (FieldPath::new("animation.overlay_enter"), &self.overlay_enter),
            (FieldPath::new("animation.overlay_exit"), &self.overlay_exit),
            (FieldPath::new("animation.container_enter"), &self.container_enter),
            (FieldPath::new("animation.container_exit"), &self.container_exit),
        ];
        for (field, class) in fields {
            if class.trim().is_empty() || class.contains(char::is_whitespace) {
                diag.error(field, "must be a single class name");
            }
        }
    }
}
