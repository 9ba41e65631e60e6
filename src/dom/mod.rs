//! Host document abstraction.
//!
//! Everything the modal does to a page goes through [`Document`]. The trait
//! is generic over the listener payload `M`: binding an event stores a value
//! that the host hands back when the event fires, so handlers are plain data
//! instead of closures that capture the controller.
//!
//! | Module    | Purpose                                          |
//! |-----------|--------------------------------------------------|
//! | `builder` | Declarative, markup-free element construction    |
//! | `memory`  | Arena-backed in-memory document                  |

pub mod builder;
pub mod memory;

pub use builder::{Child, ElementBuilder, ElementSpec};
pub use memory::{DataLayer, MemoryDocument, NodeId};

use crate::scroll::ScrollState;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Namespace URI for SVG elements.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Namespace URI for HTML elements.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Element namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Namespace {
    #[default]
    Html,
    Svg,
}

impl Namespace {
    /// Pick the namespace for a tag from the SVG allow-list.
    ///
    /// Unknown tags are HTML.
    pub fn for_tag(tag: &str) -> Self {
        if crate::config::ModalConfig::is_svg_tag(tag) {
            Self::Svg
        } else {
            Self::Html
        }
    }

    pub const fn uri(self) -> &'static str {
        match self {
            Self::Html => HTML_NAMESPACE,
            Self::Svg => SVG_NAMESPACE,
        }
    }
}

/// DOM mutation failures.
///
/// These are races with the page (a node or container vanished) or host
/// faults; callers swallow them at the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("node is not part of this document")]
    Detached,
    #[error("<{0}> not found")]
    MissingContainer(&'static str),
    #[error("node is not a child of the given parent")]
    NotAChild,
    #[error("node cannot be inserted into itself or its descendants")]
    Hierarchy,
    #[error("host error: {0}")]
    Host(String),
}

/// Outcome of pushing to the page's analytics data layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// Entry appended.
    Pushed,
    /// The data-layer slot holds something that is not a queue.
    Foreign,
}

/// Page surface used by the modal.
///
/// Element handles are cheap to clone. Methods that can lose a race with
/// the page return `Result`; lookups return `Option`.
pub trait Document<M> {
    type Node: Clone + fmt::Debug;

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Create a detached element.
    fn create_element(&mut self, ns: Namespace, tag: &str) -> Result<Self::Node, DomError>;

    /// Assign an attribute verbatim. The value is never parsed as markup.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str)
    -> Result<(), DomError>;

    /// Add a class. Adding a class that is already present is a no-op.
    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Swap `from` for `to`. Returns `false` if `from` was not present.
    fn replace_class(&mut self, node: &Self::Node, from: &str, to: &str) -> bool;

    /// Replace all children with a single text node.
    fn set_text(&mut self, node: &Self::Node, text: &str) -> Result<(), DomError>;

    /// Bind `payload` to `event` on `node`.
    fn add_listener(&mut self, node: &Self::Node, event: &str, payload: M)
    -> Result<(), DomError>;

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Insert `child` as the first child of `parent`.
    fn prepend_child(&mut self, parent: &Self::Node, child: &Self::Node)
    -> Result<(), DomError>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Whether `node` is attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// First connected element carrying `id`, in tree order.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// `root` and its descendants carrying `class`, in tree order.
    fn elements_by_class(&self, root: &Self::Node, class: &str) -> Vec<Self::Node>;

    fn head(&self) -> Option<Self::Node>;

    fn body(&self) -> Option<Self::Node>;

    // ------------------------------------------------------------------
    // Window
    // ------------------------------------------------------------------

    /// Current location href.
    fn location(&self) -> String;

    fn scroll_offset(&self) -> ScrollState;

    fn scroll_to(&mut self, offset: ScrollState);

    /// Set an inline style property.
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str)
    -> Result<(), DomError>;

    /// Clear an inline style property.
    fn remove_style(&mut self, node: &Self::Node, property: &str) -> Result<(), DomError>;

    /// Whether a browser-like window is present at all.
    fn has_window(&self) -> bool;

    /// Append an entry to the page's data layer, creating it if absent.
    fn push_data_layer(&mut self, entry: &Value) -> Result<SinkStatus, DomError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_for_tag() {
        assert_eq!(Namespace::for_tag("svg"), Namespace::Svg);
        assert_eq!(Namespace::for_tag("path"), Namespace::Svg);
        assert_eq!(Namespace::for_tag("button"), Namespace::Html);
        // Unknown tags fall back to HTML
        assert_eq!(Namespace::for_tag("lcs-widget"), Namespace::Html);
    }

    #[test]
    fn test_namespace_uri() {
        assert_eq!(Namespace::Svg.uri(), "http://www.w3.org/2000/svg");
        assert_eq!(Namespace::Html.uri(), "http://www.w3.org/1999/xhtml");
    }
}
