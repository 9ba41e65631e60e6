//! Modal tree composition.
//!
//! ```text
//! div#lcs-modal.lcs-modal.fadeIn
//! └── div.lcs-modal__container.moveDown
//!     ├── div.lcs-modal__header.lcs-modal__content
//!     │   ├── h5.lcs-modal__header--title
//!     │   └── button.lcs-modal__header--close [aria-label]
//!     │       └── figure > svg > path, path
//!     ├── div.lcs-modal__body.lcs-modal__content
//!     │   └── p.lcs-modal__body--p
//!     └── div.lcs-modal__footer.lcs-modal__content
//!         └── button.lcs-modal__footer--cta [aria-label]
//! ```
//!
//! Assembly only builds the detached tree. Both buttons carry payloads
//! supplied by the caller; nothing here reacts to them.

use crate::config::ModalConfig;
use crate::dom::{Document, DomError, ElementBuilder, ElementSpec};

/// The two strokes of the close glyph.
const CLOSE_ICON_PATHS: [&str; 2] = ["M18 6L6 18", "M6 6L18 18"];

/// Payloads bound to the close and call-to-action controls.
#[derive(Debug, Clone)]
pub struct ModalHandlers<M> {
    pub on_close: M,
    pub on_cta: M,
}

/// Builds the modal tree from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ModalAssembler<'a> {
    config: &'a ModalConfig,
}

type Built<N> = Result<ElementBuilder<N>, DomError>;

impl<'a> ModalAssembler<'a> {
    pub fn new(config: &'a ModalConfig) -> Self {
        Self { config }
    }

    /// Build the complete, detached modal root.
    pub fn assemble<M, D: Document<M>>(
        &self,
        doc: &mut D,
        handlers: ModalHandlers<M>,
    ) -> Result<D::Node, DomError> {
        let ModalHandlers { on_close, on_cta } = handlers;
        let animation = &self.config.animation;

        let header = self.header(doc, on_close)?;
        let body = self.body(doc)?;
        let footer = self.footer(doc, on_cta)?;

        let container = ElementBuilder::build(
            doc,
            ElementSpec::new("div")
                .classes(["lcs-modal__container", animation.container_enter.as_str()])
                .children([header, body, footer]),
        )?;

        let root = ElementBuilder::build(
            doc,
            ElementSpec::new("div")
                .attr("id", self.config.id.as_str())
                .classes(["lcs-modal", animation.overlay_enter.as_str()])
                .child(container),
        )?;
        Ok(root.into_node())
    }

    fn header<M, D: Document<M>>(&self, doc: &mut D, on_close: M) -> Built<D::Node> {
        let copy = &self.config.copy;

        let title = ElementBuilder::build(
            doc,
            ElementSpec::new("h5")
                .class("lcs-modal__header--title")
                .text(copy.title_or_placeholder()),
        )?;

        let paths = CLOSE_ICON_PATHS
            .iter()
            .map(|d| close_icon_path(doc, d))
            .collect::<Result<Vec<_>, _>>()?;
        let icon = ElementBuilder::build(
            doc,
            ElementSpec::new("svg")
                .attrs([
                    ("width", "100%"),
                    ("height", "100%"),
                    ("viewBox", "0 0 24 24"),
                    ("fill", "none"),
                    ("xmlns", crate::dom::SVG_NAMESPACE),
                ])
                .children(paths),
        )?;
        let figure = ElementBuilder::build(
            doc,
            ElementSpec::new("figure")
                .class("lcs-modal__header--figure")
                .child(icon),
        )?;
        let close = ElementBuilder::build(
            doc,
            ElementSpec::new("button")
                .attrs([("type", "button"), ("aria-label", copy.close_label.as_str())])
                .class("lcs-modal__header--close")
                .child(figure)
                .on("click", on_close),
        )?;

        ElementBuilder::build(
            doc,
            ElementSpec::new("div")
                .classes(["lcs-modal__header", "lcs-modal__content"])
                .children([title, close]),
        )
    }

    fn body<M, D: Document<M>>(&self, doc: &mut D) -> Built<D::Node> {
        let paragraph = ElementBuilder::build(
            doc,
            ElementSpec::new("p")
                .class("lcs-modal__body--p")
                .text(self.config.copy.body_or_placeholder()),
        )?;
        ElementBuilder::build(
            doc,
            ElementSpec::new("div")
                .classes(["lcs-modal__body", "lcs-modal__content"])
                .child(paragraph),
        )
    }

    fn footer<M, D: Document<M>>(&self, doc: &mut D, on_cta: M) -> Built<D::Node> {
        let copy = &self.config.copy;
        let cta = ElementBuilder::build(
            doc,
            ElementSpec::new("button")
                .attrs([("type", "button"), ("aria-label", copy.cta_label.as_str())])
                .class("lcs-modal__footer--cta")
                .text(copy.button_or_placeholder())
                .on("click", on_cta),
        )?;
        ElementBuilder::build(
            doc,
            ElementSpec::new("div")
                .classes(["lcs-modal__footer", "lcs-modal__content"])
                .child(cta),
        )
    }
}

fn close_icon_path<M, D: Document<M>>(doc: &mut D, d: &str) -> Built<D::Node> {
    ElementBuilder::build(
        doc,
        ElementSpec::new("path").attrs([
            ("d", d),
            ("stroke", "#6C6F75"),
            ("stroke-width", "2"),
            ("stroke-linecap", "round"),
            ("stroke-linejoin", "round"),
        ]),
    )
}
