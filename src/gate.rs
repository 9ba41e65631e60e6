//! Injection preconditions.
//!
//! Three checks, in order, stopping at the first failure:
//!
//! 1. the page has a `<body>`
//! 2. no element already carries the modal id
//! 3. the location contains one of the allowed URLs
//!
//! Checking never mutates the document and can be repeated freely.

use crate::config::ModalConfig;
use crate::dom::Document;
use thiserror::Error;

/// Why the gate refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateFailure {
    #[error("body not found")]
    MissingBody,
    #[error("modal already exists in the current context")]
    AlreadyInjected,
    #[error("divergent url")]
    DivergentUrl,
}

/// Composite precondition over document state and location.
#[derive(Debug, Clone, Copy)]
pub struct ValidationGate<'a> {
    config: &'a ModalConfig,
}

impl<'a> ValidationGate<'a> {
    pub fn new(config: &'a ModalConfig) -> Self {
        Self { config }
    }

    /// Run all checks, returning the first failure.
    pub fn check<M, D: Document<M>>(&self, doc: &D) -> Result<(), GateFailure> {
        if !Self::has_body(doc) {
            return Err(GateFailure::MissingBody);
        }
        if self.has_injected_modal(doc) {
            return Err(GateFailure::AlreadyInjected);
        }
        if !self.is_allowed_location(doc) {
            return Err(GateFailure::DivergentUrl);
        }
        Ok(())
    }

    pub fn has_body<M, D: Document<M>>(doc: &D) -> bool {
        doc.body().is_some()
    }

    pub fn has_injected_modal<M, D: Document<M>>(&self, doc: &D) -> bool {
        doc.element_by_id(&self.config.id).is_some()
    }

    pub fn has_injected_style<M, D: Document<M>>(&self, doc: &D) -> bool {
        doc.element_by_id(&self.config.style_id).is_some()
    }

    /// Substring match of the location against the allow-list.
    pub fn is_allowed_location<M, D: Document<M>>(&self, doc: &D) -> bool {
        let href = doc.location();
        self.config
            .allowed_urls
            .iter()
            .any(|url| href.contains(url.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ALLOWED_URL;
    use crate::dom::{MemoryDocument, Namespace};

    fn allowed_page() -> MemoryDocument<()> {
        MemoryDocument::new(format!("{DEFAULT_ALLOWED_URL}?utm_source=email"))
    }

    #[test]
    fn test_passes_on_allowed_page() {
        let config = ModalConfig::default();
        let gate = ValidationGate::new(&config);
        assert_eq!(gate.check(&allowed_page()), Ok(()));
    }

    #[test]
    fn test_missing_body_checked_first() {
        let config = ModalConfig::default();
        let gate = ValidationGate::new(&config);
        let mut doc = MemoryDocument::<()>::new("https://elsewhere.example/");
        doc.remove_body();
        // Location is also wrong, but body is reported
        assert_eq!(gate.check(&doc), Err(GateFailure::MissingBody));
    }

    #[test]
    fn test_existing_modal_rejected() {
        let config = ModalConfig::default();
        let gate = ValidationGate::new(&config);
        let mut doc = allowed_page();
        let body = doc.body().unwrap();
        let competitor = doc.create_element(Namespace::Html, "div").unwrap();
        doc.set_attribute(&competitor, "id", "lcs-modal").unwrap();
        doc.append_child(&body, &competitor).unwrap();

        assert_eq!(gate.check(&doc), Err(GateFailure::AlreadyInjected));
    }

    #[test]
    fn test_divergent_url_rejected() {
        let config = ModalConfig::default();
        let gate = ValidationGate::new(&config);
        let doc = MemoryDocument::<()>::new("https://abrasuaconta.santander.com.br/landing/outra");

        let failure = gate.check(&doc).unwrap_err();
        assert_eq!(failure, GateFailure::DivergentUrl);
        assert_eq!(failure.to_string(), "divergent url");
    }

    #[test]
    fn test_check_is_repeatable_and_pure() {
        let config = ModalConfig::default();
        let gate = ValidationGate::new(&config);
        let doc = allowed_page();
        let before = doc.outer_html(doc.root());
        for _ in 0..3 {
            assert_eq!(gate.check(&doc), Ok(()));
        }
        assert_eq!(doc.outer_html(doc.root()), before);
    }

    #[test]
    fn test_any_allowed_substring_matches() {
        let mut config = ModalConfig::default();
        config.allowed_urls = vec![
            "http://127.0.0.1:5500/index.html".into(),
            DEFAULT_ALLOWED_URL.into(),
        ];
        let gate = ValidationGate::new(&config);
        let doc = MemoryDocument::<()>::new("http://127.0.0.1:5500/index.html#top");
        assert!(gate.is_allowed_location(&doc));
    }
}
