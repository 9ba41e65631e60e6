//! Style block injection.
//!
//! The configured fragments are rendered, whitespace-collapsed and joined
//! into one `<style>` element appended to `<head>`. Some pages strip or
//! reject head insertions without an error, so the caller schedules
//! [`StyleInjector::fallback`], which moves the same node to the start of
//! `<body>` if the block is still missing.

use crate::config::ModalConfig;
use crate::debug;
use crate::dom::{Document, DomError, ElementBuilder, ElementSpec};
use crate::embed::{StyleVars, TemplateVars};
use crate::gate::ValidationGate;

/// Render every fragment and collapse whitespace runs to single spaces.
pub fn compile_styles(config: &ModalConfig) -> String {
    let vars = StyleVars::from_config(config);
    config
        .styles
        .iter()
        .map(|fragment| collapse_whitespace(&vars.apply(fragment)))
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[inline]
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Idempotent style block injection.
#[derive(Debug, Clone, Copy)]
pub struct StyleInjector<'a> {
    config: &'a ModalConfig,
}

impl<'a> StyleInjector<'a> {
    pub fn new(config: &'a ModalConfig) -> Self {
        Self { config }
    }

    /// Insert the style block into `<head>` unless one already exists.
    ///
    /// Returns the created node so the caller can schedule the fallback,
    /// or `None` when a block was already present. A missing or failing
    /// head is not an error: the fallback covers it.
    pub fn inject<M, D: Document<M>>(&self, doc: &mut D) -> Result<Option<D::Node>, DomError> {
        if ValidationGate::new(self.config).has_injected_style(doc) {
            debug!("style"; "style block already present");
            return Ok(None);
        }

        let style = ElementBuilder::build(
            doc,
            ElementSpec::new("style")
                .attr("id", self.config.style_id.as_str())
                .text(compile_styles(self.config)),
        )?
        .into_node();

        match doc.head() {
            Some(head) => {
                if let Err(e) = doc.append_child(&head, &style) {
                    debug!("style"; "head insertion failed: {}", e);
                }
            }
            None => debug!("style"; "no <head>, deferring to fallback"),
        }
        Ok(Some(style))
    }

    /// Move `style` to the start of `<body>` if no block is present.
    ///
    /// Returns `true` if the node was inserted. Never fails: a vanished
    /// container only means nothing happens.
    pub fn fallback<M, D: Document<M>>(&self, doc: &mut D, style: &D::Node) -> bool {
        if ValidationGate::new(self.config).has_injected_style(doc) || doc.is_connected(style) {
            return false;
        }
        let Some(body) = doc.body() else {
            debug!("style"; "fallback skipped, <body> is gone");
            return false;
        };
        match doc.prepend_child(&body, style) {
            Ok(()) => {
                debug!("style"; "style block moved to <body>");
                true
            }
            Err(e) => {
                debug!("style"; "fallback insertion failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, NodeId};

    fn page() -> MemoryDocument<()> {
        MemoryDocument::new("https://example.com/")
    }

    #[test]
    fn test_compile_styles_collapses_whitespace() {
        let mut config = ModalConfig::default();
        config.styles = vec![
            "  .a {\n    color: red;\n  }\n".into(),
            "\t\n".into(),
            "#__MODAL_ID__.__OVERLAY_ENTER__ { opacity: 1; }".into(),
        ];
        assert_eq!(
            compile_styles(&config),
            ".a { color: red; } #lcs-modal.fadeIn { opacity: 1; }"
        );
    }

    #[test]
    fn test_default_styles_compile_to_one_line() {
        let css = compile_styles(&ModalConfig::default());
        assert!(!css.contains('\n'));
        assert!(!css.contains("  "));
        assert!(css.starts_with(".lcs-modal {"));
        assert!(css.contains("#lcs-modal.fadeOut { animation: fadeOut 0.4s ease-out forwards; }"));
        assert!(css.contains(".lcs-modal__container.moveUp {"));
        assert!(css.contains("@media (max-width: 576px)"));
        assert!(!css.contains("__MODAL_ID__"));
        assert!(!css.contains("_ENTER__"));
    }

    #[test]
    fn test_inject_appends_to_head() {
        let config = ModalConfig::default();
        let mut doc = page();
        let style = StyleInjector::new(&config).inject(&mut doc).unwrap().unwrap();

        assert_eq!(doc.parent(&style), doc.head());
        assert_eq!(doc.attribute(style, "id"), Some("style-lcs-modal"));
        assert_eq!(doc.text_content(style), compile_styles(&config));
    }

    #[test]
    fn test_inject_is_idempotent() {
        let config = ModalConfig::default();
        let injector = StyleInjector::new(&config);
        let mut doc = page();
        assert!(injector.inject(&mut doc).unwrap().is_some());
        for _ in 0..4 {
            assert!(injector.inject(&mut doc).unwrap().is_none());
        }
        assert_eq!(doc.count_by_id("style-lcs-modal"), 1);
    }

    #[test]
    fn test_fallback_noop_when_head_kept_it() {
        let config = ModalConfig::default();
        let injector = StyleInjector::new(&config);
        let mut doc = page();
        let style = injector.inject(&mut doc).unwrap().unwrap();
        assert!(!injector.fallback(&mut doc, &style));
        assert_eq!(doc.parent(&style), doc.head());
    }

    #[test]
    fn test_fallback_moves_stripped_block_to_body() {
        let config = ModalConfig::default();
        let injector = StyleInjector::new(&config);
        let mut doc = page();
        doc.strip_head_appends(true);

        let style = injector.inject(&mut doc).unwrap().unwrap();
        assert!(!doc.is_connected(&style));

        assert!(injector.fallback(&mut doc, &style));
        let body = doc.body().unwrap();
        assert_eq!(doc.children(body).first(), Some(&style));

        // Second run finds the block and does nothing
        assert!(!injector.fallback(&mut doc, &style));
        assert_eq!(doc.count_by_id("style-lcs-modal"), 1);
    }

    #[test]
    fn test_inject_without_head_relies_on_fallback() {
        let config = ModalConfig::default();
        let injector = StyleInjector::new(&config);
        let mut doc = page();
        doc.remove_head();

        let style = injector.inject(&mut doc).unwrap().unwrap();
        assert!(injector.fallback(&mut doc, &style));
        assert!(doc.is_connected(&style));
    }

    #[test]
    fn test_fallback_tolerates_missing_body() {
        let config = ModalConfig::default();
        let injector = StyleInjector::new(&config);
        let mut doc = page();
        doc.remove_head();
        let style: NodeId = injector.inject(&mut doc).unwrap().unwrap();
        doc.remove_body();
        assert!(!injector.fallback(&mut doc, &style));
    }
}
