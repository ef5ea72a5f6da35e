use std::time::{Duration, Instant};

use tracing::debug;

use crate::document::{Document, NodeId};
use crate::page::{Command, Page};
use crate::prompt::PromptAnimation;
use crate::scroll::{ScrollController, Viewport};
use crate::typing::Orchestrator;

/// Class marking an opened command
pub const ACTIVE_CLASS: &str = "active";
pub const VISIBLE_CLASS: &str = "visible";
pub const HIDDEN_CLASS: &str = "hidden";

/// Where a section is in its open/close cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Hidden,
    /// Prompt is being erased; the output opens when it is empty
    Opening,
    Open,
}

#[derive(Debug, Clone)]
struct SectionSlot {
    state: SectionState,
    prompt_anim: Option<PromptAnimation>,
}

/// Opens and closes sections in response to command selection
///
/// Each section owns at most one prompt animation. A toggle that arrives
/// while one is running replaces it, so erase and retype never overlap on
/// the same label.
#[derive(Debug)]
pub struct ToggleController {
    slots: Vec<SectionSlot>,
    orchestrator: Orchestrator,
    scroll: ScrollController,
    prompt_delay: Duration,
}

impl ToggleController {
    pub fn new(
        page: &Page,
        orchestrator: Orchestrator,
        scroll: ScrollController,
        prompt_delay: Duration,
    ) -> Self {
        let slots = page
            .commands
            .iter()
            .map(|command| {
                let open = page
                    .output_of(command)
                    .and_then(|out| page.doc.element(out))
                    .is_some_and(|el| el.has_class(VISIBLE_CLASS));
                SectionSlot {
                    state: if open {
                        SectionState::Open
                    } else {
                        SectionState::Hidden
                    },
                    prompt_anim: None,
                }
            })
            .collect();

        Self {
            slots,
            orchestrator,
            scroll,
            prompt_delay,
        }
    }

    pub fn state(&self, index: usize) -> Option<SectionState> {
        self.slots.get(index).map(|slot| slot.state)
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollController {
        &mut self.scroll
    }

    /// Toggle the section of command `index`.
    ///
    /// A command whose output container does not exist is ignored.
    pub fn toggle(&mut self, page: &mut Page, index: usize, now: Instant) {
        let Some(command) = page.commands.get(index) else {
            return;
        };
        let Some(output) = page.output_of(command) else {
            debug!(section = %command.target, "Toggle ignored: no output container");
            return;
        };
        let command = command.clone();
        let slot = &mut self.slots[index];

        match slot.state {
            SectionState::Open => {
                if let Some(el) = page.doc.element_mut(output) {
                    el.replace_class(VISIBLE_CLASS, HIDDEN_CLASS);
                }
                if let Some(el) = page.doc.element_mut(command.node) {
                    el.remove_class(ACTIVE_CLASS);
                }
                self.orchestrator.restore(&mut page.doc, output);
                slot.state = SectionState::Hidden;
                slot.prompt_anim = retype(&command, now);
                debug!(section = %command.target, "Section closed");
            }
            SectionState::Opening => {
                slot.state = SectionState::Hidden;
                slot.prompt_anim = retype(&command, now);
                debug!(section = %command.target, "Section open cancelled");
            }
            SectionState::Hidden => {
                slot.state = SectionState::Opening;
                slot.prompt_anim = command
                    .prompt
                    .map(|prompt| PromptAnimation::erase(prompt, now));
                debug!(section = %command.target, "Section opening");
            }
        }
    }

    /// Run a scroll frame if one is due, advance prompt animations, open
    /// sections whose prompt is erased, then advance typing.
    ///
    /// A scroll started here gets its first frame on the next tick, once
    /// the caller has measured the opened section.
    pub fn tick(&mut self, page: &mut Page, viewport: &mut dyn Viewport, now: Instant) {
        self.scroll.tick(viewport, now);

        for index in 0..self.slots.len() {
            let finished = match self.slots[index].prompt_anim.as_mut() {
                Some(anim) => anim.advance(&mut page.doc, now, self.prompt_delay),
                None => true,
            };
            if !finished {
                continue;
            }
            self.slots[index].prompt_anim = None;

            if self.slots[index].state == SectionState::Opening {
                self.open(page, index, viewport, now);
            }
        }

        self.orchestrator.tick(&mut page.doc, now);
    }

    fn open(&mut self, page: &mut Page, index: usize, viewport: &dyn Viewport, now: Instant) {
        let Some(command) = page.commands.get(index).cloned() else {
            return;
        };
        self.slots[index].state = SectionState::Open;

        let Some(output) = page.output_of(&command) else {
            return;
        };
        mark_open(&mut page.doc, command.node, output);

        let section = page.section_of(&command);
        self.scroll.scroll_to(&page.doc, section, viewport, now);
        self.orchestrator.animate(&mut page.doc, output, now);
        debug!(section = %command.target, "Section opened");
    }

    /// Earliest pending prompt step, typing step or scroll frame
    pub fn next_deadline(&self) -> Option<Instant> {
        self.slots
            .iter()
            .filter_map(|slot| slot.prompt_anim.as_ref().map(PromptAnimation::next_deadline))
            .chain(self.orchestrator.next_deadline())
            .chain(self.scroll.next_deadline())
            .min()
    }

    /// True while anything is moving
    pub fn is_busy(&self) -> bool {
        self.slots.iter().any(|slot| slot.prompt_anim.is_some())
            || !self.orchestrator.is_idle()
            || self.scroll.is_scrolling()
    }
}

fn retype(command: &Command, now: Instant) -> Option<PromptAnimation> {
    command
        .prompt
        .map(|prompt| PromptAnimation::retype(prompt, &command.prompt_text, now))
}

fn mark_open(doc: &mut Document, command: NodeId, output: NodeId) {
    if let Some(el) = doc.element_mut(command) {
        el.add_class(ACTIVE_CLASS);
    }
    if let Some(el) = doc.element_mut(output) {
        el.replace_class(HIDDEN_CLASS, VISIBLE_CLASS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::entities;
    use crate::scroll::viewport::testing::FixedViewport;
    use crate::scroll::ScrollConfig;

    const PAGE: &str = r#"<div class="terminal-body"><section><div class="command" data-target="about"><span class="prompt">me &gt;</span> whoami</div><div id="about" class="output hidden"><p>Hi <em>there</em></p><p class="btn-row">b</p></div></section><section><div class="command" data-target="ghost"><span class="prompt">me &gt;</span> ghost</div></section></div>"#;
    const PROMPT_DELAY: Duration = Duration::from_millis(10);

    fn setup() -> (Page, ToggleController, FixedViewport) {
        let page = Page::from_html(PAGE);
        let controller = ToggleController::new(
            &page,
            Orchestrator::new(Duration::from_millis(5)),
            ScrollController::new(ScrollConfig::default()),
            PROMPT_DELAY,
        );
        (page, controller, FixedViewport::new(30, 30))
    }

    fn settle(
        controller: &mut ToggleController,
        page: &mut Page,
        viewport: &mut FixedViewport,
        start: Instant,
    ) -> Instant {
        let mut now = start;
        for _ in 0..10_000 {
            controller.tick(page, viewport, now);
            if !controller.is_busy() {
                return now;
            }
            now += Duration::from_millis(16);
        }
        panic!("controller never settled");
    }

    fn prompt_text(page: &Page) -> String {
        entities::decode(&page.doc.text_content(page.commands[0].prompt.unwrap()))
    }

    fn output_classes(page: &Page) -> Vec<String> {
        let out = page.output_of(&page.commands[0]).unwrap();
        page.doc.element(out).unwrap().classes.clone()
    }

    #[test]
    fn test_open_erases_prompt_then_types() {
        let (mut page, mut controller, mut viewport) = setup();
        let t0 = Instant::now();

        controller.toggle(&mut page, 0, t0);
        assert_eq!(controller.state(0), Some(SectionState::Opening));

        controller.tick(&mut page, &mut viewport, t0);
        assert_eq!(prompt_text(&page), "me ");
        assert!(output_classes(&page).contains(&"hidden".to_string()));

        settle(&mut controller, &mut page, &mut viewport, t0);
        assert_eq!(controller.state(0), Some(SectionState::Open));
        assert_eq!(prompt_text(&page), "");
        assert_eq!(output_classes(&page), vec!["output", "visible"]);

        let command = page.doc.element(page.commands[0].node).unwrap();
        assert!(command.has_class(ACTIVE_CLASS));

        let out = page.output_of(&page.commands[0]).unwrap();
        assert_eq!(
            page.doc.inner_markup(out),
            r#"<p>Hi <em>there</em></p><p class="btn-row">b</p>"#
        );
    }

    #[test]
    fn test_close_restores_and_retypes_prompt() {
        let (mut page, mut controller, mut viewport) = setup();
        let t0 = Instant::now();
        controller.toggle(&mut page, 0, t0);
        // Stop mid-typing
        let mut now = t0;
        while controller.state(0) != Some(SectionState::Open) {
            now += Duration::from_millis(10);
            controller.tick(&mut page, &mut viewport, now);
        }

        controller.toggle(&mut page, 0, now);
        assert_eq!(controller.state(0), Some(SectionState::Hidden));
        assert_eq!(output_classes(&page), vec!["output", "hidden"]);
        assert!(controller.orchestrator().carets().next().is_none());

        let out = page.output_of(&page.commands[0]).unwrap();
        let p = Orchestrator::eligible_elements(&page.doc, out)[0];
        assert_eq!(page.doc.inner_markup(p), "Hi <em>there</em>");

        settle(&mut controller, &mut page, &mut viewport, now);
        assert_eq!(prompt_text(&page), "me >");
        let command = page.doc.element(page.commands[0].node).unwrap();
        assert!(!command.has_class(ACTIVE_CLASS));
    }

    #[test]
    fn test_toggle_during_erase_cancels_open() {
        let (mut page, mut controller, mut viewport) = setup();
        let t0 = Instant::now();
        controller.toggle(&mut page, 0, t0);
        controller.tick(&mut page, &mut viewport, t0);
        assert_eq!(prompt_text(&page), "me ");

        controller.toggle(&mut page, 0, t0);
        assert_eq!(controller.state(0), Some(SectionState::Hidden));

        settle(&mut controller, &mut page, &mut viewport, t0);
        assert_eq!(prompt_text(&page), "me >");
        assert_eq!(output_classes(&page), vec!["output", "hidden"]);
    }

    #[test]
    fn test_missing_output_is_ignored() {
        let (mut page, mut controller, mut viewport) = setup();
        let before = page.doc.inner_markup(page.doc.root());
        let t0 = Instant::now();

        controller.toggle(&mut page, 1, t0);
        controller.tick(&mut page, &mut viewport, t0 + Duration::from_secs(1));
        assert_eq!(controller.state(1), Some(SectionState::Hidden));
        assert!(!controller.is_busy());
        assert_eq!(page.doc.inner_markup(page.doc.root()), before);

        // Out of range index as well
        controller.toggle(&mut page, 7, t0);
    }

    #[test]
    fn test_reopen_replays_same_original() {
        let (mut page, mut controller, mut viewport) = setup();
        let t0 = Instant::now();
        controller.toggle(&mut page, 0, t0);
        let now = settle(&mut controller, &mut page, &mut viewport, t0);
        controller.toggle(&mut page, 0, now);
        let now = settle(&mut controller, &mut page, &mut viewport, now);
        controller.toggle(&mut page, 0, now);
        settle(&mut controller, &mut page, &mut viewport, now);

        let out = page.output_of(&page.commands[0]).unwrap();
        assert_eq!(
            page.doc.inner_markup(out),
            r#"<p>Hi <em>there</em></p><p class="btn-row">b</p>"#
        );
    }

    #[test]
    fn test_open_scrolls_low_command_into_view() {
        let (mut page, mut controller, _) = setup();
        let mut viewport = FixedViewport::new(30, 200);
        viewport.rows.insert(page.commands[0].node, 25);
        let t0 = Instant::now();

        controller.toggle(&mut page, 0, t0);
        let mut now = t0;
        while controller.state(0) != Some(SectionState::Open) {
            now += Duration::from_millis(10);
            controller.tick(&mut page, &mut viewport, now);
        }
        assert_eq!(controller.scroll().target(), Some(24));
        assert_eq!(viewport.scroll_top, 0);

        settle(&mut controller, &mut page, &mut viewport, now);
        assert_eq!(viewport.scroll_top, 23);
    }

    #[test]
    fn test_initially_visible_output_starts_open() {
        let page = Page::from_html(
            r#"<section><div class="command" data-target="a">x</div><div id="a" class="visible"></div></section>"#,
        );
        let controller = ToggleController::new(
            &page,
            Orchestrator::new(Duration::from_millis(5)),
            ScrollController::default(),
            PROMPT_DELAY,
        );
        assert_eq!(controller.state(0), Some(SectionState::Open));
    }
}
