use std::time::Instant;

use tracing::debug;

use crate::document::{Document, NodeId};

use super::cancel::CancelToken;
use super::config::ScrollConfig;
use super::viewport::Viewport;

/// Class of the element a scroll run aims at
pub const COMMAND_CLASS: &str = "command";

/// Result of one frame of a scroll run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Moved by one step; another frame is needed
    Moved,
    Cancelled,
    /// Within one row of the target
    Arrived,
    /// Already at the bottom of the content
    AtBound,
    /// Position did not change since the previous frame
    Stalled,
}

/// One in-progress scroll toward a target row
#[derive(Debug, Clone)]
pub struct ScrollRun {
    target: i32,
    previous: Option<u16>,
    token: CancelToken,
}

impl ScrollRun {
    pub fn new(target: i32, token: CancelToken) -> Self {
        Self {
            target,
            previous: None,
            token,
        }
    }

    #[inline]
    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Run one frame. The run is handed back only if it needs another one.
    pub fn frame(mut self, viewport: &mut dyn Viewport, step: u16) -> (Option<Self>, FrameOutcome) {
        let current = viewport.scroll_top();
        let remaining = self.target - i32::from(current);

        let outcome = if self.token.is_cancelled() {
            FrameOutcome::Cancelled
        } else if remaining <= 1 {
            FrameOutcome::Arrived
        } else if current >= viewport.max_scroll() {
            FrameOutcome::AtBound
        } else if self.previous == Some(current) {
            FrameOutcome::Stalled
        } else {
            self.previous = Some(current);
            viewport.set_scroll_top(current.saturating_add(step));
            return (Some(self), FrameOutcome::Moved);
        };

        (None, outcome)
    }
}

/// Owns the single scroll run of the page
#[derive(Debug, Clone, Default)]
pub struct ScrollController {
    config: ScrollConfig,
    run: Option<ScrollRun>,
    next_frame: Option<Instant>,
}

impl ScrollController {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            run: None,
            next_frame: None,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    #[inline]
    pub fn is_scrolling(&self) -> bool {
        self.run.is_some()
    }

    /// Target row of the active run
    pub fn target(&self) -> Option<i32> {
        self.run.as_ref().map(ScrollRun::target)
    }

    /// Stop the active run, if any
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            run.token.cancel();
            debug!(target_row = run.target, "Scroll cancelled");
        }
        self.next_frame = None;
    }

    /// Start scrolling so the command of `section` sits near the top.
    ///
    /// Any active run is cancelled first. Nothing happens when the section
    /// or its command is missing, or when the command is not below the
    /// lower third of the view. Returns the new run's cancel token.
    pub fn scroll_to(
        &mut self,
        doc: &Document,
        section: Option<NodeId>,
        viewport: &dyn Viewport,
        now: Instant,
    ) -> Option<CancelToken> {
        self.cancel();

        let section = section?;
        let command = doc.find_descendant(section, |el| el.has_class(COMMAND_CLASS))?;
        let row = viewport.row_of(command)?;

        let scroll_top = i32::from(viewport.scroll_top());
        let top = i32::from(row) - scroll_top;
        let lower_third = f64::from(viewport.height()) * (2.0 / 3.0);
        if f64::from(top) <= lower_third {
            return None;
        }

        let target = scroll_top + top - i32::from(self.config.margin);
        let token = CancelToken::new();
        debug!(row, target_row = target, "Scroll started");

        self.run = Some(ScrollRun::new(target, token.clone()));
        self.next_frame = Some(now);
        Some(token)
    }

    /// Run at most one frame if one is due at `now`
    pub fn tick(&mut self, viewport: &mut dyn Viewport, now: Instant) -> Option<FrameOutcome> {
        let due = self.next_frame?;
        if now < due {
            return None;
        }

        let run = self.run.take()?;
        let (run, outcome) = run.frame(viewport, self.config.step);
        self.run = run;
        self.next_frame = self.run.as_ref().map(|_| now + self.config.frame_interval);

        if outcome != FrameOutcome::Moved {
            debug!(?outcome, scroll_top = viewport.scroll_top(), "Scroll finished");
        }
        Some(outcome)
    }

    /// When the next frame is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::viewport::testing::FixedViewport;
    use proptest::prelude::*;
    use std::time::Duration;

    const PAGE: &str = r#"<section id="s"><div class="command">cmd</div></section>"#;

    fn setup(row: u16, scroll_top: u16, height: u16, content: u16) -> (Document, NodeId, FixedViewport) {
        let doc = Document::parse(PAGE);
        let section = doc.find_by_id("s").unwrap();
        let command = doc
            .find_descendant(section, |el| el.has_class(COMMAND_CLASS))
            .unwrap();
        let mut viewport = FixedViewport::new(height, content);
        viewport.scroll_top = scroll_top;
        viewport.rows.insert(command, row);
        (doc, section, viewport)
    }

    fn drive(scroll: &mut ScrollController, viewport: &mut FixedViewport, start: Instant) -> usize {
        let mut frames = 0;
        let mut now = start;
        while scroll.is_scrolling() {
            scroll.tick(viewport, now);
            frames += 1;
            now += Duration::from_millis(16);
            assert!(frames < 10_000, "scroll never terminated");
        }
        frames
    }

    #[test]
    fn test_no_scroll_above_lower_third() {
        // height 30 -> boundary 20; row 20 is not strictly below it
        let (doc, section, mut viewport) = setup(20, 0, 30, 200);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();

        assert!(scroll.scroll_to(&doc, Some(section), &viewport, t0).is_none());
        assert!(!scroll.is_scrolling());
        scroll.tick(&mut viewport, t0);
        assert_eq!(viewport.scroll_top, 0);
    }

    #[test]
    fn test_scrolls_to_command_minus_margin() {
        let (doc, section, mut viewport) = setup(50, 0, 30, 200);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();

        scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();
        assert_eq!(scroll.target(), Some(49));

        drive(&mut scroll, &mut viewport, t0);
        // Stops once within one row of the target
        assert_eq!(viewport.scroll_top, 48);
    }

    #[test]
    fn test_stops_at_bound() {
        let (doc, section, mut viewport) = setup(50, 0, 30, 40);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();

        scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();
        drive(&mut scroll, &mut viewport, t0);
        assert_eq!(viewport.scroll_top, viewport.max_scroll());
    }

    #[test]
    fn test_stall_detection() {
        let (doc, section, mut viewport) = setup(50, 0, 30, 200);
        viewport.frozen = true;
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();

        scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();
        assert_eq!(scroll.tick(&mut viewport, t0), Some(FrameOutcome::Moved));
        let next = t0 + Duration::from_millis(16);
        assert_eq!(scroll.tick(&mut viewport, next), Some(FrameOutcome::Stalled));
        assert!(!scroll.is_scrolling());
    }

    #[test]
    fn test_termination_is_bounded_by_distance() {
        for (row, step) in [(40u16, 1u16), (120, 1), (120, 7), (300, 3)] {
            let (doc, section, mut viewport) = setup(row, 0, 30, 1000);
            let config = ScrollConfig {
                step,
                ..Default::default()
            };
            let mut scroll = ScrollController::new(config);
            let t0 = Instant::now();
            scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();

            let frames = drive(&mut scroll, &mut viewport, t0);
            let bound = usize::from(row) / usize::from(step) + 2;
            assert!(frames <= bound, "row {row} step {step}: {frames} frames");
        }
    }

    #[test]
    fn test_cancel_stops_run_and_flags_token() {
        let (doc, section, mut viewport) = setup(80, 0, 30, 200);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();

        let token = scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();
        scroll.tick(&mut viewport, t0);
        scroll.cancel();

        assert!(token.is_cancelled());
        assert!(!scroll.is_scrolling());
        let before = viewport.scroll_top;
        scroll.tick(&mut viewport, t0 + Duration::from_secs(1));
        assert_eq!(viewport.scroll_top, before);
    }

    #[test]
    fn test_external_token_cancel_is_seen_at_next_frame() {
        let (doc, section, mut viewport) = setup(80, 0, 30, 200);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();

        let token = scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();
        token.cancel();
        assert_eq!(scroll.tick(&mut viewport, t0), Some(FrameOutcome::Cancelled));
        assert_eq!(viewport.scroll_top, 0);
    }

    #[test]
    fn test_new_request_supersedes_previous() {
        let (doc, section, viewport) = setup(80, 0, 30, 200);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();

        let first = scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();
        let second = scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_missing_section_or_command_is_noop() {
        let (doc, _, viewport) = setup(80, 0, 30, 200);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();
        assert!(scroll.scroll_to(&doc, None, &viewport, t0).is_none());

        let bare = Document::parse(r#"<section id="s"><p>no command</p></section>"#);
        let section = bare.find_by_id("s");
        assert!(scroll.scroll_to(&bare, section, &viewport, t0).is_none());
    }

    #[test]
    fn test_frames_wait_for_interval() {
        let (doc, section, mut viewport) = setup(80, 0, 30, 200);
        let mut scroll = ScrollController::default();
        let t0 = Instant::now();
        scroll.scroll_to(&doc, Some(section), &viewport, t0).unwrap();

        scroll.tick(&mut viewport, t0);
        assert_eq!(viewport.scroll_top, 1);
        assert_eq!(scroll.tick(&mut viewport, t0 + Duration::from_millis(1)), None);
        assert_eq!(viewport.scroll_top, 1);
    }

    proptest! {
        #[test]
        fn scroll_terminates_within_distance_over_step(
            row in 0u16..2000,
            scroll_top in 0u16..2000,
            height in 1u16..200,
            content in 0u16..3000,
            step in 1u16..50,
        ) {
            let (doc, section, mut viewport) = setup(row, scroll_top, height, content);
            let mut scroll = ScrollController::new(ScrollConfig {
                step,
                ..Default::default()
            });
            let t0 = Instant::now();

            if scroll.scroll_to(&doc, Some(section), &viewport, t0).is_some() {
                let distance = scroll.target().unwrap_or(0) - i32::from(scroll_top);
                let bound = distance.max(0) / i32::from(step) + 2;
                let frames = drive(&mut scroll, &mut viewport, t0);
                prop_assert!(
                    i32::try_from(frames).unwrap() <= bound,
                    "{} frames, bound {}", frames, bound
                );
            }
            prop_assert!(!scroll.is_scrolling());
        }
    }
}
