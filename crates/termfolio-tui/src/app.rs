use std::collections::HashMap;
use std::time::Instant;

use ratatui::layout::Rect;
use termfolio_core::scroll::Viewport;
use termfolio_core::{NodeId, SectionState, Session};

use crate::render::{self, RenderedPage};
use crate::theme::Theme;
use crate::widgets::WindowLayout;

/// Scroll state of the page body, measured in content rows
#[derive(Debug, Default, Clone)]
pub struct PageView {
    pub scroll_top: u16,
    pub height: u16,
    pub content_height: u16,
    rows: HashMap<NodeId, u16>,
}

impl PageView {
    /// Adopt a fresh layout, keeping the scroll position in range
    pub fn update(&mut self, rendered: &RenderedPage, height: u16) {
        self.rows.clone_from(rendered.rows());
        self.content_height = rendered.height();
        self.height = height;
        self.scroll_top = self.scroll_top.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let top = (i32::from(self.scroll_top) + delta).max(0);
        self.set_scroll_top(u16::try_from(top).unwrap_or(u16::MAX));
    }
}

impl Viewport for PageView {
    fn scroll_top(&self) -> u16 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, top: u16) {
        self.scroll_top = top.min(self.max_scroll());
    }

    fn max_scroll(&self) -> u16 {
        self.content_height.saturating_sub(self.height)
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn row_of(&self, node: NodeId) -> Option<u16> {
        self.rows.get(&node).copied()
    }
}

/// Application state
pub struct App {
    pub session: Session,
    pub theme: Theme,
    pub title: String,
    pub view: PageView,
    /// Last layout of the page body
    pub rendered: RenderedPage,
    /// Screen areas of the last frame
    pub layout: WindowLayout,
    /// Command highlighted for keyboard toggling
    pub selected: Option<usize>,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(session: Session, theme: Theme, title: impl Into<String>) -> Self {
        Self {
            session,
            theme,
            title: title.into(),
            view: PageView::default(),
            rendered: RenderedPage::default(),
            layout: WindowLayout::default(),
            selected: None,
            should_quit: false,
            status_message: None,
        }
    }

    /// Recompute screen areas for a terminal of size `area`
    pub fn resize(&mut self, area: Rect) {
        self.layout = WindowLayout::new(area);
        self.relayout();
    }

    /// Lay the page out again at the current body width
    pub fn relayout(&mut self) {
        let body = self.layout.body;
        self.rendered = render::render_page(
            self.session.page(),
            self.session.controller().orchestrator().carets(),
            self.selected,
            &self.theme,
            body.width,
        );
        self.view.update(&self.rendered, body.height);
    }

    /// Advance every animation to `now` and refresh the layout
    pub fn tick(&mut self, now: Instant) {
        self.session.tick(&mut self.view, now);
        self.relayout();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    /// Manual scroll; stops any auto-scroll in progress
    pub fn scroll_by(&mut self, delta: i32) {
        self.session.cancel_scroll();
        self.view.scroll_by(delta);
    }

    pub fn scroll_page_down(&mut self) {
        let page = i32::from(self.view.height.max(1));
        self.scroll_by(page);
    }

    pub fn scroll_page_up(&mut self) {
        let page = i32::from(self.view.height.max(1));
        self.scroll_by(-page);
    }

    pub fn jump_to_top(&mut self) {
        self.session.cancel_scroll();
        self.view.set_scroll_top(0);
    }

    pub fn jump_to_bottom(&mut self) {
        self.session.cancel_scroll();
        let bottom = self.view.max_scroll();
        self.view.set_scroll_top(bottom);
    }

    pub fn command_count(&self) -> usize {
        self.session.page().commands.len()
    }

    pub fn select_next(&mut self) {
        let count = self.command_count();
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(index) => (index + 1) % count,
            None => 0,
        });
        self.reveal_selected();
    }

    pub fn select_prev(&mut self) {
        let count = self.command_count();
        if count == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(0) | None => count - 1,
            Some(index) => index - 1,
        });
        self.reveal_selected();
    }

    /// Scroll just enough to bring the selected command into view
    fn reveal_selected(&mut self) {
        self.relayout();
        let Some((start, end)) = self.selected.and_then(|i| self.rendered.command_rows(i)) else {
            return;
        };
        self.session.cancel_scroll();
        if start < self.view.scroll_top {
            self.view.set_scroll_top(start);
        } else if end > self.view.scroll_top.saturating_add(self.view.height) {
            self.view.set_scroll_top(end.saturating_sub(self.view.height));
        }
    }

    pub fn toggle_selected(&mut self, now: Instant) {
        if let Some(index) = self.selected {
            self.toggle(index, now);
        }
    }

    pub fn toggle(&mut self, index: usize, now: Instant) {
        if index >= self.command_count() {
            return;
        }
        self.selected = Some(index);
        self.clear_status();
        self.session.toggle(index, now);
        self.relayout();
    }

    /// Mouse click at screen position `(column, row)`
    pub fn click(&mut self, column: u16, row: u16, now: Instant) {
        if contains(self.layout.close_button, column, row) {
            self.should_quit = true;
            return;
        }
        let body = self.layout.body;
        if !contains(body, column, row) {
            return;
        }

        let content_row = self.view.scroll_top.saturating_add(row - body.y);
        if let Some(index) = self.rendered.command_at(content_row) {
            self.toggle(index, now);
        }
    }

    /// State of the selected section, for the status bar
    pub fn selected_state(&self) -> Option<SectionState> {
        self.selected.and_then(|index| self.session.state(index))
    }

    pub fn is_typing(&self) -> bool {
        !self.session.controller().orchestrator().is_idle()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
