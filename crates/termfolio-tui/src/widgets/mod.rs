mod page_view;
mod status_bar;
mod window;

pub use page_view::PageViewWidget;
pub use status_bar::StatusBarWidget;
pub use window::{WindowLayout, WindowWidget, CLOSE_LABEL};

use ratatui::Frame;

use crate::app::App;

/// Draw a whole frame from the current app state
pub fn draw(frame: &mut Frame, app: &App) {
    WindowWidget::render(frame, app);
    PageViewWidget::render(frame, app);
    StatusBarWidget::render(frame, app);
}
