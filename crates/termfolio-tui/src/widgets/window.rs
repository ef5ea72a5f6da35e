use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;

/// Label of the close button drawn in the title bar
pub const CLOSE_LABEL: &str = "[x]";

/// Screen areas of the terminal window
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowLayout {
    /// Outer frame including borders
    pub window: Rect,
    /// Page content inside the frame
    pub body: Rect,
    /// Clickable `[x]` in the top border
    pub close_button: Rect,
    pub status: Rect,
}

impl WindowLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let window = chunks[0];

        let inner = Block::default().borders(Borders::ALL).inner(window);
        // One column of padding on each side
        let body = Rect {
            x: inner.x.saturating_add(1),
            width: inner.width.saturating_sub(2),
            ..inner
        };

        let label_width = CLOSE_LABEL.len() as u16;
        let close_button = Rect {
            x: window.right().saturating_sub(label_width + 1),
            y: window.y,
            width: label_width.min(window.width),
            height: window.height.min(1),
        };

        Self {
            window,
            body,
            close_button,
            status: chunks[1],
        }
    }
}

pub struct WindowWidget;

impl WindowWidget {
    /// Draw the frame, title bar and close button
    pub fn render(frame: &mut Frame, app: &App) {
        let theme = &app.theme;
        let chrome = Style::default().fg(theme.chrome).bg(theme.chrome_bg);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(chrome)
            .title(Line::from(Span::styled(
                format!(" {} ", app.title),
                chrome.add_modifier(Modifier::BOLD),
            )))
            .title_top(
                Line::from(Span::styled(
                    CLOSE_LABEL,
                    Style::default()
                        .fg(theme.close)
                        .bg(theme.chrome_bg)
                        .add_modifier(Modifier::BOLD),
                ))
                .right_aligned(),
            )
            .style(Style::default().bg(theme.background));

        frame.render_widget(block, app.layout.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_areas() {
        let layout = WindowLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.window, Rect::new(0, 0, 80, 23));
        assert_eq!(layout.status, Rect::new(0, 23, 80, 1));
        assert_eq!(layout.body, Rect::new(2, 1, 76, 21));
        // Right-aligned title ends just before the corner
        assert_eq!(layout.close_button, Rect::new(76, 0, 3, 1));
    }

    #[test]
    fn test_tiny_terminal_does_not_underflow() {
        let layout = WindowLayout::new(Rect::new(0, 0, 2, 1));
        assert_eq!(layout.body.width, 0);
    }
}
