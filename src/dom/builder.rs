//! Declarative element construction.
//!
//! An [`ElementSpec`] describes one element: tag, attributes, classes, an
//! optional text payload, event bindings and children. [`ElementBuilder`]
//! turns it into a live node through the [`Document`] API only:
//!
//! - attributes are assigned verbatim, never parsed
//! - text replaces content as a single text node
//! - events bind payloads directly, never inline handler attributes
//! - the namespace comes from the SVG tag allow-list
//!
//! There is no way to hand raw markup to the builder.
//!
//! # Example
//!
//! ```ignore
//! let title = ElementBuilder::build(doc, ElementSpec::new("h5").class("title").text("Hi"))?;
//! let header = ElementBuilder::build(doc, ElementSpec::new("div").child(title))?;
//! let node = header.into_node();
//! ```

use super::{Document, DomError, Namespace};
use smallvec::SmallVec;

/// A child to append: a node built elsewhere, a builder result, or nothing.
#[derive(Debug)]
pub enum Child<N> {
    Node(N),
    Built(ElementBuilder<N>),
    /// Placeholder for an optional child; skipped on append.
    Skip,
}

impl<N> From<ElementBuilder<N>> for Child<N> {
    fn from(builder: ElementBuilder<N>) -> Self {
        Self::Built(builder)
    }
}

impl<N> From<Option<ElementBuilder<N>>> for Child<N> {
    fn from(builder: Option<ElementBuilder<N>>) -> Self {
        builder.map_or(Self::Skip, Self::Built)
    }
}

/// Declarative description of a single element.
#[derive(Debug)]
pub struct ElementSpec<N, M> {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: SmallVec<[String; 4]>,
    text: Option<String>,
    events: Vec<(String, M)>,
    children: Vec<Child<N>>,
}

impl<N, M> ElementSpec<N, M> {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            classes: SmallVec::new(),
            text: None,
            events: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn attrs<K, V>(mut self, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attrs
            .extend(attrs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add a class. Duplicates are merged.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn classes<C: Into<String>>(self, classes: impl IntoIterator<Item = C>) -> Self {
        classes.into_iter().fold(self, |spec, class| spec.class(class))
    }

    /// Text payload. An empty string leaves the element empty.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Bind `payload` to `event`.
    pub fn on(mut self, event: impl Into<String>, payload: M) -> Self {
        self.events.push((event.into(), payload));
        self
    }

    pub fn child(mut self, child: impl Into<Child<N>>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<C: Into<Child<N>>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

/// A built element. The only accessor hands out the node.
#[derive(Debug)]
pub struct ElementBuilder<N> {
    element: N,
}

impl<N: Clone> ElementBuilder<N> {
    /// Build `spec` into a detached element.
    ///
    /// Fails only if the element itself cannot be created or configured;
    /// children that cannot be appended are skipped.
    pub fn build<M, D>(doc: &mut D, spec: ElementSpec<N, M>) -> Result<Self, DomError>
    where
        D: Document<M, Node = N>,
    {
        let ElementSpec {
            tag,
            attrs,
            classes,
            text,
            events,
            children,
        } = spec;

        let element = doc.create_element(Namespace::for_tag(&tag), &tag)?;

        for (name, value) in &attrs {
            doc.set_attribute(&element, name, value)?;
        }
        for class in &classes {
            doc.add_class(&element, class)?;
        }
        if let Some(text) = text.as_deref().filter(|t| !t.is_empty()) {
            doc.set_text(&element, text)?;
        }
        for (event, payload) in events {
            doc.add_listener(&element, &event, payload)?;
        }
        for child in children {
            let node = match child {
                Child::Node(node) => node,
                Child::Built(builder) => builder.element,
                Child::Skip => continue,
            };
            if let Err(e) = doc.append_child(&element, &node) {
                crate::debug!("builder"; "skipped child of <{}>: {}", tag, e);
            }
        }

        Ok(Self { element })
    }

    /// The built node.
    pub fn get(&self) -> &N {
        &self.element
    }

    pub fn into_node(self) -> N {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDocument, NodeId};

    type Doc = MemoryDocument<u8>;
    type Spec = ElementSpec<NodeId, u8>;

    fn doc() -> Doc {
        MemoryDocument::new("https://example.com/")
    }

    #[test]
    fn test_build_sets_everything() {
        let mut doc = doc();
        let built = ElementBuilder::build(
            &mut doc,
            Spec::new("button")
                .attr("type", "button")
                .attr("aria-label", "Fechar")
                .classes(["a", "b", "a"])
                .text("Close")
                .on("click", 7),
        )
        .unwrap();
        let node = *built.get();

        assert_eq!(doc.tag(node), Some("button"));
        assert_eq!(doc.namespace(node), Some(Namespace::Html));
        assert_eq!(doc.attribute(node, "aria-label"), Some("Fechar"));
        assert_eq!(doc.classes(node), &["a".to_string(), "b".to_string()]);
        assert_eq!(doc.text_content(node), "Close");
        assert_eq!(doc.listener_count(node), 1);
    }

    #[test]
    fn test_svg_namespace_from_allow_list() {
        let mut doc = doc();
        let path = ElementBuilder::build(&mut doc, Spec::new("path").attr("d", "M18 6L6 18")).unwrap();
        let svg = ElementBuilder::build(&mut doc, Spec::new("svg").child(path)).unwrap();
        let svg = svg.into_node();

        assert_eq!(doc.namespace(svg), Some(Namespace::Svg));
        let path = doc.children(svg)[0];
        assert_eq!(doc.namespace(path), Some(Namespace::Svg));
    }

    #[test]
    fn test_unknown_tag_is_html() {
        let mut doc = doc();
        let node = ElementBuilder::build(&mut doc, Spec::new("lcs-widget")).unwrap();
        assert_eq!(doc.namespace(*node.get()), Some(Namespace::Html));
    }

    #[test]
    fn test_markup_in_text_and_attrs_stays_inert() {
        let mut doc = doc();
        let node = ElementBuilder::build(
            &mut doc,
            Spec::new("p")
                .attr("title", "\"><script>alert(1)</script>")
                .text("<img src=x onerror=alert(1)>"),
        )
        .unwrap()
        .into_node();

        // One text child, no element children
        assert_eq!(doc.children(node).len(), 1);
        assert!(doc.element_children(node).is_empty());
        assert_eq!(doc.text_content(node), "<img src=x onerror=alert(1)>");
        assert_eq!(
            doc.attribute(node, "title"),
            Some("\"><script>alert(1)</script>")
        );
    }

    #[test]
    fn test_empty_text_leaves_element_empty() {
        let mut doc = doc();
        let node = ElementBuilder::build(&mut doc, Spec::new("p").text("")).unwrap();
        assert!(doc.children(*node.get()).is_empty());
    }

    #[test]
    fn test_children_in_order_and_skip() {
        let mut doc = doc();
        let existing = doc.create_element(Namespace::Html, "span").unwrap();
        let built = ElementBuilder::build(&mut doc, Spec::new("em")).unwrap();
        let none: Option<ElementBuilder<NodeId>> = None;

        let parent = ElementBuilder::build(
            &mut doc,
            Spec::new("div")
                .child(Child::Node(existing))
                .child(none)
                .child(Child::Skip)
                .child(built),
        )
        .unwrap()
        .into_node();

        let tags: Vec<_> = doc
            .children(parent)
            .iter()
            .map(|&c| doc.tag(c).unwrap())
            .collect();
        assert_eq!(tags, vec!["span", "em"]);
    }

    #[test]
    fn test_unappendable_child_is_skipped() {
        let mut doc = doc();
        let root = doc.root();
        let node = ElementBuilder::build(&mut doc, Spec::new("div").child(Child::Node(root)))
            .unwrap()
            .into_node();
        assert!(doc.children(node).is_empty());
    }

    #[test]
    fn test_invalid_class_fails_build() {
        let mut doc = doc();
        let result = ElementBuilder::build(&mut doc, Spec::new("div").class("two words"));
        assert!(result.is_err());
    }
}
