use std::time::{Duration, Instant};

use crate::document::{Caret, Document, NodeId};
use crate::markup::Token;

use super::timer::Pacer;

/// Outcome of one engine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A character was printed; the run suspends for one character delay
    Printed,
    /// Every token has been applied and the caret is gone
    Done,
}

/// Replays a token sequence into an element, one character per step
///
/// The run is an index into an immutable token list plus a caret. Tags
/// never suspend: every tag between two characters is applied inside the
/// same step, so no intermediate nesting is ever observable.
#[derive(Debug, Clone)]
pub struct TypingRun {
    tokens: Vec<Token>,
    index: usize,
    caret: Option<Caret>,
}

impl TypingRun {
    /// Start a run with the caret at the end of `root`
    pub fn new(tokens: Vec<Token>, root: NodeId) -> Self {
        Self {
            tokens,
            index: 0,
            caret: Some(Caret::new(root)),
        }
    }

    /// Caret of an unfinished run
    pub fn caret(&self) -> Option<&Caret> {
        self.caret.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.caret.is_none()
    }

    /// Tokens applied so far
    pub fn position(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Apply tokens until one character is printed or the input runs out
    pub fn step(&mut self, doc: &mut Document) -> Step {
        let Some(caret) = self.caret.as_mut() else {
            return Step::Done;
        };

        while let Some(token) = self.tokens.get(self.index) {
            self.index += 1;
            caret.apply(doc, token);
            if token.is_text() {
                return Step::Printed;
            }
        }

        self.caret = None;
        Step::Done
    }

    /// Run every step due at `now`; true once the run has finished
    pub fn advance(
        &mut self,
        doc: &mut Document,
        pacer: &mut Pacer,
        now: Instant,
        char_delay: Duration,
    ) -> bool {
        while pacer.is_due(now) {
            match self.step(doc) {
                Step::Printed => pacer.delay(char_delay),
                Step::Done => return true,
            }
        }
        false
    }
}
