use std::path::Path;

use tracing::{debug, warn};

use crate::document::{Document, NodeId};
use crate::markup::entities;
use crate::scroll::controller::COMMAND_CLASS;

/// Class of the prompt label inside a command
pub const PROMPT_CLASS: &str = "prompt";
/// Class of the scrollable page body
pub const BODY_CLASS: &str = "terminal-body";

/// Page shipped with the binary, used when no page is configured
const SAMPLE_PAGE: &str = include_str!("../assets/portfolio.html");

/// A clickable command line and the output it toggles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub node: NodeId,
    /// `data-target`: id of the output container
    pub target: String,
    /// Prompt label element
    pub prompt: Option<NodeId>,
    /// Decoded prompt text as loaded; retyped after closing
    pub prompt_text: String,
    /// Decoded command text after the prompt
    pub label: String,
}

/// A loaded page: the node arena plus its discovered commands
#[derive(Debug, Clone)]
pub struct Page {
    pub doc: Document,
    pub commands: Vec<Command>,
}

impl Page {
    pub fn from_html(html: &str) -> Self {
        let doc = Document::parse(html);
        let commands = discover_commands(&doc);
        debug!(commands = commands.len(), nodes = doc.len(), "Page loaded");
        Self { doc, commands }
    }

    /// Read and parse a page file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let html = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::Page(format!("cannot read {}: {}", path.display(), e))
        })?;
        let page = Self::from_html(&html);
        if page.commands.is_empty() {
            warn!("Page {} has no commands", path.display());
        }
        Ok(page)
    }

    /// The built-in sample page
    pub fn sample() -> Self {
        Self::from_html(SAMPLE_PAGE)
    }

    /// Element to render and scroll: `.terminal-body`, else `<body>`, else the root
    pub fn body(&self) -> NodeId {
        let root = self.doc.root();
        self.doc
            .find_descendant(root, |el| el.has_class(BODY_CLASS))
            .or_else(|| self.doc.find_descendant(root, |el| el.is("body")))
            .unwrap_or(root)
    }

    /// Output container a command toggles, if it exists
    pub fn output_of(&self, command: &Command) -> Option<NodeId> {
        self.doc.find_by_id(&command.target)
    }

    /// Enclosing `<section>` of a command
    pub fn section_of(&self, command: &Command) -> Option<NodeId> {
        self.doc.closest(command.node, |el| el.is("section"))
    }

    pub fn command_for_target(&self, target: &str) -> Option<usize> {
        self.commands.iter().position(|c| c.target == target)
    }

    /// Index of the command containing `node`
    pub fn command_containing(&self, node: NodeId) -> Option<usize> {
        self.commands
            .iter()
            .position(|c| self.doc.is_inclusive_ancestor(c.node, node))
    }
}

fn discover_commands(doc: &Document) -> Vec<Command> {
    let root = doc.root();
    doc.select(root, |el| el.has_class(COMMAND_CLASS))
        .into_iter()
        .filter_map(|node| {
            let Some(target) = doc.element(node).and_then(|el| el.data("target")) else {
                debug!(node = node.index(), "Command without data-target skipped");
                return None;
            };
            let prompt = doc.find_descendant(node, |el| el.has_class(PROMPT_CLASS));
            let prompt_text = prompt
                .map(|p| entities::decode(&doc.text_content(p)))
                .unwrap_or_default();
            let full = entities::decode(&doc.text_content(node));
            let label = full
                .strip_prefix(prompt_text.as_str())
                .unwrap_or(full.as_str())
                .trim()
                .to_string();

            Some(Command {
                node,
                target: target.to_string(),
                prompt,
                prompt_text,
                label,
            })
        })
        .collect()
}
