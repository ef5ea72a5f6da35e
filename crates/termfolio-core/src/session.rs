use std::time::Instant;

use tracing::{debug, info};

use crate::config::AppConfig;
use crate::page::Page;
use crate::scroll::{ScrollConfig, ScrollController, Viewport};
use crate::toggle::{SectionState, ToggleController};
use crate::typing::Orchestrator;

/// A page together with the controllers animating it
#[derive(Debug)]
pub struct Session {
    page: Page,
    controller: ToggleController,
    /// Command opened automatically once its time comes
    auto_open: Option<(usize, Instant)>,
}

impl Session {
    pub fn new(page: Page, config: &AppConfig, now: Instant) -> Self {
        let controller = ToggleController::new(
            &page,
            Orchestrator::new(config.timing.char_delay()),
            ScrollController::new(ScrollConfig::from(&config.timing)),
            config.timing.prompt_delay(),
        );

        let auto_open = config.startup.auto_open_target().and_then(|target| {
            let index = page.command_for_target(target);
            if index.is_none() {
                debug!(section = target, "Auto-open target not on page");
            }
            index.map(|index| (index, now + config.startup.delay()))
        });

        info!(commands = page.commands.len(), "Session started");
        Self {
            page,
            controller,
            auto_open,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn controller(&self) -> &ToggleController {
        &self.controller
    }

    pub fn state(&self, index: usize) -> Option<SectionState> {
        self.controller.state(index)
    }

    /// Toggle command `index`. A user toggle drops a pending auto-open.
    pub fn toggle(&mut self, index: usize, now: Instant) {
        self.auto_open = None;
        self.controller.toggle(&mut self.page, index, now);
    }

    pub fn toggle_target(&mut self, target: &str, now: Instant) -> bool {
        match self.page.command_for_target(target) {
            Some(index) => {
                self.toggle(index, now);
                true
            }
            None => false,
        }
    }

    /// Stop auto-scrolling, e.g. when the user scrolls by hand
    pub fn cancel_scroll(&mut self) {
        self.controller.scroll_mut().cancel();
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.controller.scroll().is_scrolling()
    }

    pub fn tick(&mut self, viewport: &mut dyn Viewport, now: Instant) {
        if let Some((index, due)) = self.auto_open {
            if now >= due {
                self.auto_open = None;
                debug!(index, "Auto-opening section");
                self.controller.toggle(&mut self.page, index, now);
            }
        }
        self.controller.tick(&mut self.page, viewport, now);
    }

    /// When `tick` next has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let auto_open = self.auto_open.map(|(_, due)| due);
        self.controller.next_deadline().into_iter().chain(auto_open).min()
    }

    pub fn is_busy(&self) -> bool {
        self.auto_open.is_some() || self.controller.is_busy()
    }
}
