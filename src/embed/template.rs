//! Typed variable injection for embedded stylesheets.

use crate::config::ModalConfig;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Variables substituted into style fragments.
///
/// Fragments reference the modal id and the animation classes through
/// placeholders so that overriding them in the configuration keeps the
/// stylesheet in sync.
#[derive(Debug, Clone, Copy)]
pub struct StyleVars<'a> {
    pub modal_id: &'a str,
    pub overlay_enter: &'a str,
    pub overlay_exit: &'a str,
    pub container_enter: &'a str,
    pub container_exit: &'a str,
}

impl<'a> StyleVars<'a> {
    pub fn from_config(config: &'a ModalConfig) -> Self {
        let animation = &config.animation;
        Self {
            modal_id: &config.id,
            overlay_enter: &animation.overlay_enter,
            overlay_exit: &animation.overlay_exit,
            container_enter: &animation.container_enter,
            container_exit: &animation.container_exit,
        }
    }
}

impl TemplateVars for StyleVars<'_> {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__MODAL_ID__", self.modal_id)
            .replace("__OVERLAY_ENTER__", self.overlay_enter)
            .replace("__OVERLAY_EXIT__", self.overlay_exit)
            .replace("__CONTAINER_ENTER__", self.container_enter)
            .replace("__CONTAINER_EXIT__", self.container_exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_vars_replace_all_placeholders() {
        let config = ModalConfig::default();
        let vars = StyleVars::from_config(&config);
        let out = vars.apply("#__MODAL_ID__.__OVERLAY_ENTER__ .x.__CONTAINER_EXIT__");
        assert_eq!(out, "#lcs-modal.fadeIn .x.moveUp");
    }
}
