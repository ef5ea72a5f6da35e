//! Node arena standing in for the page DOM
//!
//! Nodes live in a slot vector addressed by [`NodeId`]. Removed subtrees
//! return their slots to a free list, so ids of removed nodes may be reused
//! and must not be held across a `clear_children` of an ancestor.

mod caret;
mod node;

pub use caret::{Applied, Caret};
pub use node::{Element, Node, NodeId, NodeKind};

use crate::markup::{tokenize, tokenize_page};

#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only a nameless root element
    pub fn new() -> Self {
        Self {
            slots: vec![Some(Node::new(NodeKind::Element(Element::root())))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Parse a whole page into a fresh document; `script` and `style`
    /// content stays text
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let mut caret = Caret::new(doc.root());
        for token in tokenize_page(html) {
            caret.apply(&mut doc, &token);
        }
        doc
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.get_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Create a detached element from a literal opening tag
    pub fn create_element(&mut self, markup: &str) -> NodeId {
        self.alloc(Node::new(NodeKind::Element(Element::from_markup(markup))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(Node::new(NodeKind::Text(text.to_string())))
    }

    /// Attach a detached node as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) {
            return;
        }
        if let Some(node) = self.get_mut(child) {
            debug_assert!(node.parent.is_none(), "node is already attached");
            node.parent = Some(parent);
        } else {
            return;
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Print one character at the end of `parent`, extending a trailing text node
    pub fn append_char(&mut self, parent: NodeId, ch: char) {
        let last = self.children(parent).last().copied();
        if let Some(NodeKind::Text(text)) = last.and_then(|id| self.get_mut(id)).map(|n| &mut n.kind) {
            text.push(ch);
            return;
        }
        let mut buf = [0u8; 4];
        let text = self.create_text(ch.encode_utf8(&mut buf));
        self.append_child(parent, text);
    }

    /// Remove every child of `id`, releasing their subtrees
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.get_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        let mut stack = children;
        while let Some(child) = stack.pop() {
            if let Some(node) = self.slots.get_mut(child.0).and_then(Option::take) {
                stack.extend(node.children);
                self.free.push(child.0);
            }
        }
    }

    /// Replace the children of `id` with the structure described by `html`
    pub fn set_inner_markup(&mut self, id: NodeId, html: &str) {
        self.clear_children(id);
        let mut caret = Caret::new(id);
        for token in tokenize(html) {
            caret.apply(self, &token);
        }
    }

    /// Replace the children of `id` with a single text node
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }

    /// Concatenated raw text of all descendants
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.get(node).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    /// Serialized children of `id`
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_outer(child, &mut out);
        }
        out
    }

    fn write_outer(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|node| &node.kind) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element(element)) => {
                out.push_str(&element.markup);
                for &child in self.children(id) {
                    self.write_outer(child, out);
                }
                if let Some(close) = &element.close_markup {
                    out.push_str(close);
                }
            }
            None => {}
        }
    }

    /// Descendants of `id` in document order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// First descendant element (document order) matching `pred`
    pub fn find_descendant(
        &self,
        id: NodeId,
        pred: impl Fn(&Element) -> bool,
    ) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|&node| self.element(node).is_some_and(&pred))
    }

    /// All descendant elements (document order) matching `pred`
    pub fn select(&self, id: NodeId, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&node| self.element(node).is_some_and(&pred))
            .collect()
    }

    /// Element with the given `id` attribute
    pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.find_descendant(self.root, |el| el.id.as_deref() == Some(element_id))
    }

    /// Nearest inclusive ancestor element matching `pred`
    pub fn closest(&self, id: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.element(node).is_some_and(&pred) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// True if `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Number of live nodes, root included
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }
}
