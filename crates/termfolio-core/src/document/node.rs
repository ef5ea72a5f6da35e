use crate::markup::TagInfo;

/// Index of a node inside a [`Document`](super::Document) arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element or text payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    /// Raw text, entities left undecoded
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }
}

/// An element built from a literal opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name; empty for declarations and the document root
    pub tag: String,
    /// Literal opening tag, reproduced verbatim on serialization
    pub markup: String,
    /// Literal closing tag that ended this element, if one was seen
    pub close_markup: Option<String>,
    pub id: Option<String>,
    /// Live class list; mutations do not rewrite `markup`
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    /// Inserted as a leaf (void element, `/>` or declaration)
    pub leaf: bool,
}

impl Element {
    pub fn from_markup(markup: &str) -> Self {
        let info = TagInfo::parse(markup);
        let leaf = info.is_leaf();
        let id = info.attr("id").map(str::to_string);
        let classes = info
            .attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            tag: info.name,
            markup: markup.to_string(),
            close_markup: None,
            id,
            classes,
            attrs: info.attrs,
            leaf,
        }
    }

    pub(crate) fn root() -> Self {
        Self {
            tag: String::new(),
            markup: String::new(),
            close_markup: None,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            leaf: false,
        }
    }

    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Swap `from` for `to` in place; false (and no change) if `from` is absent
    pub fn replace_class(&mut self, from: &str, to: &str) -> bool {
        match self.classes.iter().position(|c| c == from) {
            Some(pos) => {
                if self.has_class(to) {
                    self.classes.remove(pos);
                } else {
                    self.classes[pos] = to.to_string();
                }
                true
            }
            None => false,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `data-*` attribute lookup, e.g. `data("target")` for `data-target`
    pub fn data(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.strip_prefix("data-") == Some(name))
            .map(|(_, value)| value.as_str())
    }
}
