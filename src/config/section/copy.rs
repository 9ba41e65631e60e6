//! `[copy]` section configuration: every user-visible string.
//!
//! # Example
//!
//! ```toml
//! [copy]
//! title = "Descubra a Conta Select"
//! button = "Explorar benefícios"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    /// Header title.
    pub title: String,
    /// Body paragraph.
    pub body: String,
    /// Call-to-action button text.
    pub button: String,
    /// Accessible label of the close control.
    pub close_label: String,
    /// Accessible label of the call-to-action control.
    pub cta_label: String,
    /// Shown when `title` is empty.
    pub title_placeholder: String,
    /// Shown when `body` is empty.
    pub body_placeholder: String,
    /// Shown when `button` is empty.
    pub button_placeholder: String,
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            title: "Descubra a Conta Select".into(),
            body: "Tenha acesso a soluções exclusivas, atendimento diferenciado e benefícios \
                   que se adaptam ao seu estilo de vida. Faça parte da Select."
                .into(),
            button: "Explorar benefícios".into(),
            close_label: "Fechar".into(),
            cta_label: "Explorar benefício".into(),
            title_placeholder: "Insira um título".into(),
            body_placeholder: "Insira um texto".into(),
            button_placeholder: "Informe um texto".into(),
        }
    }
}

impl CopyConfig {
    pub fn title_or_placeholder(&self) -> &str {
        non_empty_or(&self.title, &self.title_placeholder)
    }

    pub fn body_or_placeholder(&self) -> &str {
        non_empty_or(&self.body, &self.body_placeholder)
    }

    pub fn button_or_placeholder(&self) -> &str {
        non_empty_or(&self.button, &self.button_placeholder)
    }
}

#[inline]
fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_used_for_empty_strings() {
        let copy = CopyConfig {
            title: String::new(),
            body: String::new(),
            button: String::new(),
            ..Default::default()
        };
        assert_eq!(copy.title_or_placeholder(), "Insira um título");
        assert_eq!(copy.body_or_placeholder(), "Insira um texto");
        assert_eq!(copy.button_or_placeholder(), "Informe um texto");
    }

    #[test]
    fn test_body_default_is_single_line() {
        let copy = CopyConfig::default();
        assert!(copy.body.starts_with("Tenha acesso a soluções exclusivas"));
        assert!(copy.body.ends_with("Faça parte da Select."));
        assert!(!copy.body.contains("  "));
    }
}
