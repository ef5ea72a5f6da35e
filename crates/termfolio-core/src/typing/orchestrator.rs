use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::document::{Document, Element, NodeId};
use crate::markup::{tokenize, Token};

use super::engine::TypingRun;
use super::timer::Pacer;

/// Class of paragraphs holding buttons; they are hidden while typing
pub const BUTTON_ROW_CLASS: &str = "btn-row";
/// Class that reveals a button row
pub const SHOW_CLASS: &str = "show";

/// Paragraphs (except button rows) and list items
pub fn is_eligible(element: &Element) -> bool {
    (element.is("p") && !element.has_class(BUTTON_ROW_CLASS)) || element.is("li")
}

/// Typing progress for one container
#[derive(Debug)]
struct ContainerRun {
    container: NodeId,
    queue: VecDeque<(NodeId, Vec<Token>)>,
    current: Option<TypingRun>,
    button_rows: Vec<NodeId>,
    pacer: Pacer,
}

impl ContainerRun {
    /// Advance to `now`; true once every element is typed
    fn advance(&mut self, doc: &mut Document, now: Instant, char_delay: Duration) -> bool {
        self.pacer.clamp_lag(now);
        loop {
            if self.current.is_none() {
                match self.queue.pop_front() {
                    Some((element, tokens)) => {
                        self.current = Some(TypingRun::new(tokens, element));
                    }
                    None => return true,
                }
            }

            let Some(run) = self.current.as_mut() else {
                continue;
            };
            if !run.advance(doc, &mut self.pacer, now, char_delay) {
                return false;
            }
            self.current = None;
        }
    }

    fn reveal_buttons(&self, doc: &mut Document) {
        for &row in &self.button_rows {
            if let Some(element) = doc.element_mut(row) {
                element.add_class(SHOW_CLASS);
            }
        }
    }
}

/// Types the eligible elements of a container one after another
///
/// Owns the original-content cache: the first animation of an element
/// stores its markup, and every later animation or restore reads that copy.
#[derive(Debug)]
pub struct Orchestrator {
    originals: HashMap<NodeId, String>,
    runs: Vec<ContainerRun>,
    char_delay: Duration,
}

impl Orchestrator {
    pub fn new(char_delay: Duration) -> Self {
        Self {
            originals: HashMap::new(),
            runs: Vec::new(),
            char_delay,
        }
    }

    /// Eligible elements of `container` in document order.
    ///
    /// Elements nested in another eligible element are skipped; they are
    /// part of their ancestor's markup and get typed with it.
    pub fn eligible_elements(doc: &Document, container: NodeId) -> Vec<NodeId> {
        let all = doc.select(container, is_eligible);
        all.iter()
            .copied()
            .filter(|&el| {
                !all.iter()
                    .any(|&other| other != el && doc.is_inclusive_ancestor(other, el))
            })
            .collect()
    }

    /// Cached original markup of an element, if it was ever animated
    pub fn original(&self, element: NodeId) -> Option<&str> {
        self.originals.get(&element).map(String::as_str)
    }

    /// Clear and start typing every eligible element of `container`.
    ///
    /// The first character is printed immediately. An unfinished run for
    /// the same container is replaced.
    pub fn animate(&mut self, doc: &mut Document, container: NodeId, now: Instant) {
        self.runs.retain(|run| run.container != container);

        let elements = Self::eligible_elements(doc, container);
        let mut queue = VecDeque::with_capacity(elements.len());
        for element in elements {
            let original = self
                .originals
                .entry(element)
                .or_insert_with(|| doc.inner_markup(element));
            let tokens = tokenize(original);
            doc.clear_children(element);
            queue.push_back((element, tokens));
        }

        let button_rows = doc.select(container, |el| el.has_class(BUTTON_ROW_CLASS));
        for &row in &button_rows {
            if let Some(element) = doc.element_mut(row) {
                element.remove_class(SHOW_CLASS);
            }
        }

        debug!(
            container = container.index(),
            elements = queue.len(),
            "Typing section"
        );

        let mut run = ContainerRun {
            container,
            queue,
            current: None,
            button_rows,
            pacer: Pacer::new(now),
        };
        if run.advance(doc, now, self.char_delay) {
            run.reveal_buttons(doc);
        } else {
            self.runs.push(run);
        }
    }

    /// Put the cached original markup back into every eligible element
    /// of `container` and drop its caret. Calling it again changes nothing.
    pub fn restore(&mut self, doc: &mut Document, container: NodeId) {
        self.runs.retain(|run| run.container != container);

        for element in Self::eligible_elements(doc, container) {
            if let Some(original) = self.originals.get(&element) {
                doc.set_inner_markup(element, original);
            }
        }
    }

    /// Advance every active run; returns the containers that finished
    pub fn tick(&mut self, doc: &mut Document, now: Instant) -> Vec<NodeId> {
        let char_delay = self.char_delay;
        let mut finished = Vec::new();

        self.runs.retain_mut(|run| {
            if run.advance(doc, now, char_delay) {
                run.reveal_buttons(doc);
                finished.push(run.container);
                false
            } else {
                true
            }
        });

        for container in &finished {
            debug!(container = container.index(), "Section typed");
        }
        finished
    }

    pub fn is_animating(&self, container: NodeId) -> bool {
        self.runs.iter().any(|run| run.container == container)
    }

    pub fn is_idle(&self) -> bool {
        self.runs.is_empty()
    }

    /// Elements that currently hold a caret
    pub fn carets(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.runs
            .iter()
            .filter_map(|run| run.current.as_ref())
            .filter_map(|typing| typing.caret())
            .map(|caret| caret.parent())
    }

    /// Earliest pending step
    pub fn next_deadline(&self) -> Option<Instant> {
        self.runs.iter().map(|run| run.pacer.due()).min()
    }
}
