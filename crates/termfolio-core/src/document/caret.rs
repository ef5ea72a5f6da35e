use super::{Document, NodeId};
use crate::markup::{TagInfo, Token};

/// What applying one token did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A character was printed
    Printed,
    /// The caret entered a new element
    Opened(NodeId),
    /// A leaf element was inserted; the caret did not move
    Inserted(NodeId),
    /// The caret left its parent
    Closed(NodeId),
    /// An explicit close tag was attached to the leaf inserted just before it
    Paired(NodeId),
    /// A close tag at the root was ignored
    Ignored,
}

/// Insertion point inside a [`Document`]
///
/// Holds the root it was created for plus the stack of elements it has
/// entered. Everything is inserted immediately before the caret, and the
/// caret only ever moves to the end of a parent, so it is always the last
/// child of [`Caret::parent`]; printing is an append to that parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caret {
    root: NodeId,
    path: Vec<NodeId>,
    /// Leaf inserted by the previous token, if nothing followed it yet
    last_leaf: Option<NodeId>,
}

impl Caret {
    /// Caret placed as the last child of `root`
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            path: Vec::new(),
            last_leaf: None,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Element the caret currently sits in
    #[inline]
    pub fn parent(&self) -> NodeId {
        self.path.last().copied().unwrap_or(self.root)
    }

    /// Nesting depth below the root
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Apply one token at the caret.
    ///
    /// A close tag naming the leaf inserted right before it (`<br></br>`)
    /// is attached to that leaf. Any other close tag pops exactly one level
    /// whatever its name, records its literal text on the element it closed,
    /// and is ignored at the root.
    pub fn apply(&mut self, doc: &mut Document, token: &Token) -> Applied {
        let last_leaf = self.last_leaf.take();
        match token {
            Token::Text { ch } => {
                doc.append_char(self.parent(), *ch);
                Applied::Printed
            }
            Token::TagOpen { markup } => {
                let element = doc.create_element(markup);
                doc.append_child(self.parent(), element);
                if doc.element(element).is_some_and(|el| el.leaf) {
                    self.last_leaf = Some(element);
                    Applied::Inserted(element)
                } else {
                    self.path.push(element);
                    Applied::Opened(element)
                }
            }
            Token::TagClose { markup } => {
                if let Some(leaf) = last_leaf.filter(|&leaf| closes_leaf(doc, leaf, markup)) {
                    if let Some(element) = doc.element_mut(leaf) {
                        element.close_markup = Some(markup.clone());
                    }
                    return Applied::Paired(leaf);
                }
                self.pop(doc, markup)
            }
        }
    }

    fn pop(&mut self, doc: &mut Document, markup: &str) -> Applied {
        match self.path.pop() {
            Some(closed) => {
                if let Some(element) = doc.element_mut(closed) {
                    element.close_markup = Some(markup.to_string());
                }
                Applied::Closed(closed)
            }
            None => Applied::Ignored,
        }
    }
}

fn closes_leaf(doc: &Document, leaf: NodeId, close_markup: &str) -> bool {
    let name = TagInfo::parse(close_markup).name;
    doc.element(leaf)
        .is_some_and(|el| !name.is_empty() && el.close_markup.is_none() && el.is(&name))
}
