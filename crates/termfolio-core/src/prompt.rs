//! Erase and retype animation for a command's prompt label

use std::time::{Duration, Instant};

use crate::document::{Document, NodeId};
use crate::markup::entities;
use crate::typing::Pacer;

/// Direction of a prompt animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptMode {
    /// Remove one character from the end per step
    Erase,
    /// Append characters of `text` until the label matches it
    Retype { text: Vec<char> },
}

/// Character-per-tick edit of a prompt label
///
/// The label's raw text is decoded before editing and escaped when written
/// back, so `&gt;` counts as one character.
#[derive(Debug, Clone)]
pub struct PromptAnimation {
    prompt: NodeId,
    mode: PromptMode,
    pacer: Pacer,
}

impl PromptAnimation {
    pub fn erase(prompt: NodeId, now: Instant) -> Self {
        Self {
            prompt,
            mode: PromptMode::Erase,
            pacer: Pacer::new(now),
        }
    }

    /// Retype `text`, continuing from whatever prefix of it is already shown
    pub fn retype(prompt: NodeId, text: &str, now: Instant) -> Self {
        Self {
            prompt,
            mode: PromptMode::Retype {
                text: text.chars().collect(),
            },
            pacer: Pacer::new(now),
        }
    }

    #[inline]
    pub fn prompt(&self) -> NodeId {
        self.prompt
    }

    pub fn mode(&self) -> &PromptMode {
        &self.mode
    }

    pub fn is_erasing(&self) -> bool {
        self.mode == PromptMode::Erase
    }

    pub fn next_deadline(&self) -> Instant {
        self.pacer.due()
    }

    /// Apply one edit; false once the label has reached its goal
    pub fn step(&self, doc: &mut Document) -> bool {
        let shown: Vec<char> = entities::decode(&doc.text_content(self.prompt))
            .chars()
            .collect();

        let next: Vec<char> = match &self.mode {
            PromptMode::Erase => {
                if shown.is_empty() {
                    return false;
                }
                shown[..shown.len() - 1].to_vec()
            }
            PromptMode::Retype { text } => {
                if shown.len() >= text.len() && shown[..] == text[..] {
                    return false;
                }
                // Keep a matching prefix; anything else is replaced
                if text.starts_with(&shown) {
                    text[..=shown.len()].to_vec()
                } else {
                    text.iter().take(1).copied().collect()
                }
            }
        };

        let next: String = next.into_iter().collect();
        doc.set_text(self.prompt, &entities::escape(&next));
        true
    }

    /// Run every edit due at `now`; true once finished
    pub fn advance(&mut self, doc: &mut Document, now: Instant, delay: Duration) -> bool {
        self.pacer.clamp_lag(now);
        while self.pacer.is_due(now) {
            if !self.step(doc) {
                return true;
            }
            self.pacer.delay(delay);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(10);

    fn prompt_doc(text: &str) -> (Document, NodeId) {
        let doc = Document::parse(&format!(r#"<span class="prompt">{text}</span>"#));
        let prompt = doc.children(doc.root())[0];
        (doc, prompt)
    }

    fn shown(doc: &Document, prompt: NodeId) -> String {
        entities::decode(&doc.text_content(prompt))
    }

    #[test]
    fn test_erase_one_char_per_tick() {
        let (mut doc, prompt) = prompt_doc("ab &gt;");
        let t0 = Instant::now();
        let mut anim = PromptAnimation::erase(prompt, t0);

        assert!(!anim.advance(&mut doc, t0, DELAY));
        assert_eq!(shown(&doc, prompt), "ab ");

        assert!(!anim.advance(&mut doc, t0 + DELAY * 2, DELAY));
        assert_eq!(shown(&doc, prompt), "a");

        // Last character goes, completion is seen one tick later
        assert!(!anim.advance(&mut doc, t0 + DELAY * 3, DELAY));
        assert_eq!(shown(&doc, prompt), "");
        assert!(anim.advance(&mut doc, t0 + DELAY * 4, DELAY));
    }

    #[test]
    fn test_erase_of_empty_prompt_finishes_immediately() {
        let (mut doc, prompt) = prompt_doc("");
        let t0 = Instant::now();
        let mut anim = PromptAnimation::erase(prompt, t0);
        assert!(anim.advance(&mut doc, t0, DELAY));
    }

    #[test]
    fn test_retype_from_empty() {
        let (mut doc, prompt) = prompt_doc("");
        let t0 = Instant::now();
        let mut anim = PromptAnimation::retype(prompt, "me >", t0);

        assert!(!anim.advance(&mut doc, t0, DELAY));
        assert_eq!(shown(&doc, prompt), "m");
        assert!(!anim.advance(&mut doc, t0 + DELAY * 3, DELAY));
        assert_eq!(shown(&doc, prompt), "me >");
        assert_eq!(doc.text_content(prompt), "me &gt;");
        assert!(anim.advance(&mut doc, t0 + DELAY * 4, DELAY));
    }

    #[test]
    fn test_retype_continues_partial_prefix() {
        let (mut doc, prompt) = prompt_doc("user@por");
        let t0 = Instant::now();
        let mut anim = PromptAnimation::retype(prompt, "user@portfolio >", t0);
        anim.advance(&mut doc, t0, DELAY);
        assert_eq!(shown(&doc, prompt), "user@port");
    }

    #[test]
    fn test_retype_replaces_foreign_text() {
        let (mut doc, prompt) = prompt_doc("xyz");
        let t0 = Instant::now();
        let mut anim = PromptAnimation::retype(prompt, "abc", t0);
        anim.advance(&mut doc, t0, DELAY);
        assert_eq!(shown(&doc, prompt), "a");
    }
}
