//! Arena-backed in-memory document.
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]; removing a node
//! only unlinks it, so handles never dangle. The document starts as
//! `<html><head></head><body></body></html>` at a given location and can be
//! bent into the broken shapes a real page sometimes has (no body, head that
//! silently drops appended nodes, no window at all).

use super::{Document, DomError, Namespace, SinkStatus};
use crate::scroll::ScrollState;
use crate::utils::html::{escape, escape_attr, is_raw_text_element, is_void_element};
use rustc_hash::FxHashMap;
use serde_json::Value;
use smallvec::SmallVec;

/// Handle to a node in a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    ns: Namespace,
    tag: String,
    attrs: Vec<(String, String)>,
    classes: SmallVec<[String; 4]>,
    style: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Contents of the page's data-layer slot.
#[derive(Debug, Clone, PartialEq)]
pub enum DataLayer {
    /// An ordered queue of entries.
    Queue(Vec<Value>),
    /// Some other value occupying the slot.
    Foreign(Value),
}

#[derive(Debug, Clone, Default)]
struct Window {
    data_layer: Option<DataLayer>,
}

/// In-memory [`Document`] implementation.
#[derive(Debug, Clone)]
pub struct MemoryDocument<M> {
    nodes: Vec<NodeData>,
    root: NodeId,
    listeners: FxHashMap<NodeId, Vec<(String, M)>>,
    location: String,
    scroll: ScrollState,
    window: Option<Window>,
    strip_head_appends: bool,
    rejected_style: Option<String>,
}

impl<M> MemoryDocument<M> {
    /// A standard page (`html > head + body`) at `location`.
    pub fn new(location: impl Into<String>) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            listeners: FxHashMap::default(),
            location: location.into(),
            scroll: ScrollState::default(),
            window: Some(Window::default()),
            strip_head_appends: false,
            rejected_style: None,
        };
        let root = doc.alloc_element(Namespace::Html, "html");
        let head = doc.alloc_element(Namespace::Html, "head");
        let body = doc.alloc_element(Namespace::Html, "body");
        doc.root = root;
        doc.link(root, head);
        doc.link(root, body);
        doc
    }

    /// Drop the window, as when running outside a browser.
    pub fn without_window(mut self) -> Self {
        self.window = None;
        self
    }

    /// Make appends to `<head>` report success without attaching anything.
    pub fn strip_head_appends(&mut self, strip: bool) {
        self.strip_head_appends = strip;
    }

    /// Make `set_style` fail for `property`, as a host refusing a value would.
    pub fn reject_style(&mut self, property: impl Into<String>) {
        self.rejected_style = Some(property.into());
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Scroll the page as a user would.
    pub fn set_scroll(&mut self, offset: ScrollState) {
        self.scroll = offset;
    }

    /// Unlink `node` from its parent. Returns `false` if it had none.
    pub fn detach(&mut self, node: NodeId) -> bool {
        self.unlink(node)
    }

    pub fn remove_head(&mut self) -> bool {
        self.head_or_body("head").is_some_and(|head| self.unlink(head))
    }

    pub fn remove_body(&mut self) -> bool {
        self.head_or_body("body").is_some_and(|body| self.unlink(body))
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Fire `event` on `node`, returning the payloads bound to it.
    ///
    /// Detached nodes cannot be interacted with and yield nothing.
    pub fn dispatch(&self, node: NodeId, event: &str) -> Vec<M>
    where
        M: Clone,
    {
        if !self.connected(node) {
            return Vec::new();
        }
        self.listeners
            .get(&node)
            .map(|bound| {
                bound
                    .iter()
                    .filter(|(name, _)| name == event)
                    .map(|(_, payload)| payload.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn click(&self, node: NodeId) -> Vec<M>
    where
        M: Clone,
    {
        self.dispatch(node, "click")
    }

    /// Number of listeners bound to `node`, any event.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.get(&node).map_or(0, Vec::len)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    pub fn namespace(&self, node: NodeId) -> Option<Namespace> {
        self.element(node).map(|e| e.ns)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let element = self.element(node)?;
        if name == "class" {
            return None;
        }
        element
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|e| e.classes.as_slice())
            .unwrap_or_default()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?
            .style
            .iter()
            .find(|(k, _)| k == property)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `node` has any inline style left.
    pub fn has_inline_style(&self, node: NodeId) -> bool {
        self.element(node).is_some_and(|e| !e.style.is_empty())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Element children only.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
            .collect()
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    /// Number of connected elements carrying `id`.
    pub fn count_by_id(&self, id: &str) -> usize {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.has_id(n, id))
            .count()
    }

    pub fn data_layer(&self) -> Option<&DataLayer> {
        self.window.as_ref()?.data_layer.as_ref()
    }

    /// Occupy the data-layer slot, e.g. with a foreign value.
    pub fn set_data_layer(&mut self, layer: DataLayer) {
        if let Some(window) = self.window.as_mut() {
            window.data_layer = Some(layer);
        }
    }

    /// Entries in the data-layer queue (empty if absent or foreign).
    pub fn data_layer_entries(&self) -> &[Value] {
        match self.data_layer() {
            Some(DataLayer::Queue(entries)) => entries,
            _ => &[],
        }
    }

    /// Serialize `node` and its subtree as markup, for diagnostics.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, false, &mut out);
        out
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(e)) => Ok(e),
            _ => Err(DomError::Detached),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn alloc_element(&mut self, ns: Namespace, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData {
            ns,
            tag: tag.to_owned(),
            attrs: Vec::new(),
            classes: SmallVec::new(),
            style: Vec::new(),
        }))
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(child);
    }

    fn unlink(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.node(child).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = None;
        }
        true
    }

    fn connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// `root` followed by its descendants, in tree order.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    fn has_id(&self, node: NodeId, id: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.attrs.iter().any(|(k, v)| k == "id" && v == id))
    }

    fn head_or_body(&self, tag: &str) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .find(|&c| self.tag(c) == Some(tag))
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.element(parent).is_none() || self.node(child).is_none() {
            return Err(DomError::Detached);
        }
        if child == self.root || self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::Hierarchy);
        }
        Ok(())
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.node(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) => {
                for &child in &data.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn write_html(&self, node: NodeId, raw_text: bool, out: &mut String) {
        let Some(data) = self.node(node) else {
            return;
        };
        let element = match &data.kind {
            NodeKind::Text(text) if raw_text => {
                out.push_str(text);
                return;
            }
            NodeKind::Text(text) => {
                out.push_str(&escape(text));
                return;
            }
            NodeKind::Element(e) => e,
        };

        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
        if !element.classes.is_empty() {
            let classes = element.classes.join(" ");
            out.push_str(&format!(" class=\"{}\"", escape_attr(&classes)));
        }
        if !element.style.is_empty() {
            let style: Vec<_> = element
                .style
                .iter()
                .map(|(k, v)| format!("{k}: {v};"))
                .collect();
            out.push_str(&format!(" style=\"{}\"", escape_attr(&style.join(" "))));
        }
        out.push('>');

        if element.ns == Namespace::Html && is_void_element(&element.tag) {
            return;
        }
        let raw = is_raw_text_element(&element.tag);
        for &child in &data.children {
            self.write_html(child, raw, out);
        }
        out.push_str(&format!("</{}>", element.tag));
    }
}

impl<M> Document<M> for MemoryDocument<M> {
    type Node = NodeId;

    fn create_element(&mut self, ns: Namespace, tag: &str) -> Result<NodeId, DomError> {
        if tag.is_empty() {
            return Err(DomError::Host("empty tag name".into()));
        }
        Ok(self.alloc_element(ns, tag))
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self.element_mut(*node)?;
        if name == "class" {
            element.classes.clear();
            for class in value.split_whitespace() {
                if !element.classes.iter().any(|c| c == class) {
                    element.classes.push(class.to_owned());
                }
            }
            return Ok(());
        }
        match element.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_owned(),
            None => element.attrs.push((name.to_owned(), value.to_owned())),
        }
        Ok(())
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        if class.is_empty() || class.contains(char::is_whitespace) {
            return Err(DomError::Host(format!("invalid class token `{class}`")));
        }
        let element = self.element_mut(*node)?;
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_owned());
        }
        Ok(())
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).iter().any(|c| c == class)
    }

    fn replace_class(&mut self, node: &NodeId, from: &str, to: &str) -> bool {
        let Ok(element) = self.element_mut(*node) else {
            return false;
        };
        let Some(pos) = element.classes.iter().position(|c| c == from) else {
            return false;
        };
        if element.classes.iter().any(|c| c == to) {
            element.classes.remove(pos);
        } else {
            element.classes[pos] = to.to_owned();
        }
        true
    }

    fn set_text(&mut self, node: &NodeId, text: &str) -> Result<(), DomError> {
        self.element_mut(*node)?;
        let old = self
            .node_mut(*node)
            .map(|n| std::mem::take(&mut n.children))
            .unwrap_or_default();
        for child in old {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
        let text = self.alloc(NodeKind::Text(text.to_owned()));
        self.link(*node, text);
        Ok(())
    }

    fn add_listener(&mut self, node: &NodeId, event: &str, payload: M) -> Result<(), DomError> {
        self.element_mut(*node)?;
        self.listeners
            .entry(*node)
            .or_default()
            .push((event.to_owned(), payload));
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.check_insert(*parent, *child)?;
        self.unlink(*child);
        if self.strip_head_appends && Some(*parent) == self.head_or_body("head") {
            return Ok(());
        }
        self.link(*parent, *child);
        Ok(())
    }

    fn prepend_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        self.check_insert(*parent, *child)?;
        self.unlink(*child);
        self.nodes[child.0 as usize].parent = Some(*parent);
        self.nodes[parent.0 as usize].children.insert(0, *child);
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        match self.node(*child).and_then(|n| n.parent) {
            Some(p) if p == *parent => {
                self.unlink(*child);
                Ok(())
            }
            Some(_) | None => Err(DomError::NotAChild),
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.node(*node)?.parent
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.connected(*node)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.has_id(n, id))
    }

    fn elements_by_class(&self, root: &NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(*root)
            .into_iter()
            .filter(|&n| self.has_class(&n, class))
            .collect()
    }

    fn head(&self) -> Option<NodeId> {
        self.head_or_body("head")
    }

    fn body(&self) -> Option<NodeId> {
        self.head_or_body("body")
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn scroll_offset(&self) -> ScrollState {
        self.scroll
    }

    fn scroll_to(&mut self, offset: ScrollState) {
        self.scroll = offset;
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        if self.rejected_style.as_deref() == Some(property) {
            return Err(DomError::Host(format!("`{property}` rejected")));
        }
        // A pinned body cannot scroll: the window offset collapses to zero.
        if Some(*node) == self.body() && property == "position" && value == "fixed" {
            self.scroll = ScrollState::default();
        }
        let element = self.element_mut(*node)?;
        match element.style.iter_mut().find(|(k, _)| k == property) {
            Some((_, v)) => *v = value.to_owned(),
            None => element.style.push((property.to_owned(), value.to_owned())),
        }
        Ok(())
    }

    fn remove_style(&mut self, node: &NodeId, property: &str) -> Result<(), DomError> {
        self.element_mut(*node)?
            .style
            .retain(|(k, _)| k != property);
        Ok(())
    }

    fn has_window(&self) -> bool {
        self.window.is_some()
    }

    fn push_data_layer(&mut self, entry: &Value) -> Result<SinkStatus, DomError> {
        let window = self
            .window
            .as_mut()
            .ok_or_else(|| DomError::Host("no window".into()))?;
        match window
            .data_layer
            .get_or_insert_with(|| DataLayer::Queue(Vec::new()))
        {
            DataLayer::Queue(entries) => {
                entries.push(entry.clone());
                Ok(SinkStatus::Pushed)
            }
            DataLayer::Foreign(_) => Ok(SinkStatus::Foreign),
        }
    }
}
