use ratatui::{style::Style, widgets::Paragraph, Frame};

use crate::app::App;

pub struct PageViewWidget;

impl PageViewWidget {
    /// Draw the visible slice of the laid-out page
    pub fn render(frame: &mut Frame, app: &App) {
        let area = app.layout.body;
        let lines = app.rendered.visible(app.view.scroll_top, area.height);

        let paragraph = Paragraph::new(lines).style(
            Style::default()
                .fg(app.theme.foreground)
                .bg(app.theme.background),
        );
        frame.render_widget(paragraph, area);
    }
}
