use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use termfolio_core::SectionState;
use unicode_width::UnicodeWidthStr;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, app: &App) {
        let area = app.layout.status;
        let theme = &app.theme;

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let command = app
                .selected
                .and_then(|index| app.session.page().commands.get(index))
                .map(|command| command.label.as_str())
                .unwrap_or("-");
            let state = match app.selected_state() {
                Some(SectionState::Open) if app.is_typing() => "typing",
                Some(SectionState::Open) => "open",
                Some(SectionState::Opening) => "opening",
                Some(SectionState::Hidden) | None => "closed",
            };
            format!(" {} [{}]", command, state)
        };

        let help_hint = " q:quit tab:select enter:toggle 1-9:open j/k:scroll ";
        let padding_len = usize::from(area.width)
            .saturating_sub(status_text.width() + help_hint.width());

        let bar = Style::default().bg(theme.chrome_bg);
        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(theme.foreground)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.dim)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
