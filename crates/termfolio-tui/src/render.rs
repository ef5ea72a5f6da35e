//! Lays a page document out as wrapped, styled terminal lines

use std::collections::{HashMap, HashSet};

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use termfolio_core::document::{Element, NodeKind};
use termfolio_core::markup::entities;
use termfolio_core::page::PROMPT_CLASS;
use termfolio_core::toggle::{ACTIVE_CLASS, HIDDEN_CLASS};
use termfolio_core::typing::{BUTTON_ROW_CLASS, SHOW_CLASS};
use termfolio_core::{Document, NodeId, Page};
use unicode_width::UnicodeWidthChar;

use crate::theme::Theme;

/// Elements that start on a fresh line
const BLOCK_TAGS: &[&str] = &[
    "html", "body", "div", "section", "article", "header", "footer", "main", "nav", "p", "ul",
    "ol", "li", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote", "table", "tr",
];

/// Elements never drawn
const SKIPPED_TAGS: &[&str] = &["head", "title", "script", "style", "noscript"];

/// Window header markup; the frame draws its own title bar
const HEADER_CLASS: &str = "terminal-header";

/// Drawn at the caret position
const CARET: char = '_';

/// Result of laying out a page at one width
#[derive(Debug, Default, Clone)]
pub struct RenderedPage {
    pub lines: Vec<Line<'static>>,
    /// First row of every laid-out element
    rows: HashMap<NodeId, u16>,
    /// Row span `[start, end)` of each command, by command index
    command_rows: Vec<Option<(u16, u16)>>,
}

impl RenderedPage {
    pub fn height(&self) -> u16 {
        to_row(self.lines.len())
    }

    pub fn row_of(&self, node: NodeId) -> Option<u16> {
        self.rows.get(&node).copied()
    }

    pub fn rows(&self) -> &HashMap<NodeId, u16> {
        &self.rows
    }

    /// Command drawn on content row `row`
    pub fn command_at(&self, row: u16) -> Option<usize> {
        self.command_rows.iter().position(|span| {
            span.is_some_and(|(start, end)| row >= start && row < end)
        })
    }

    pub fn command_rows(&self, index: usize) -> Option<(u16, u16)> {
        self.command_rows.get(index).copied().flatten()
    }

    /// Lines for the visible window starting at `scroll_top`
    pub fn visible(&self, scroll_top: u16, height: u16) -> Vec<Line<'static>> {
        self.lines
            .iter()
            .skip(usize::from(scroll_top))
            .take(usize::from(height))
            .cloned()
            .collect()
    }
}

/// Lay out the body of `page` for a view `width` columns wide.
///
/// `carets` are the elements currently holding a typing caret; `selected`
/// is the command index highlighted for keyboard use.
pub fn render_page(
    page: &Page,
    carets: impl IntoIterator<Item = NodeId>,
    selected: Option<usize>,
    theme: &Theme,
    width: u16,
) -> RenderedPage {
    let selected = selected
        .and_then(|index| page.commands.get(index))
        .map(|command| command.node);

    let mut layout = Layout {
        doc: &page.doc,
        theme,
        width: usize::from(width.max(1)),
        carets: carets.into_iter().collect(),
        selected,
        lines: Vec::new(),
        spans: Vec::new(),
        line_width: 0,
        pending_space: false,
        rows: HashMap::new(),
        extents: HashMap::new(),
    };

    let base = Style::default().fg(theme.foreground);
    let body = page.body();
    layout.children(body, base);
    layout.break_line();

    let command_rows = page
        .commands
        .iter()
        .map(|command| layout.extents.get(&command.node).copied())
        .collect();

    RenderedPage {
        lines: layout.lines,
        rows: layout.rows,
        command_rows,
    }
}

struct Layout<'a> {
    doc: &'a Document,
    theme: &'a Theme,
    width: usize,
    carets: HashSet<NodeId>,
    selected: Option<NodeId>,
    lines: Vec<Line<'static>>,
    /// Spans of the line being built
    spans: Vec<Span<'static>>,
    line_width: usize,
    /// Collapsed whitespace waiting for the next visible character
    pending_space: bool,
    rows: HashMap<NodeId, u16>,
    extents: HashMap<NodeId, (u16, u16)>,
}

impl Layout<'_> {
    fn row(&self) -> u16 {
        to_row(self.lines.len())
    }

    fn children(&mut self, id: NodeId, style: Style) {
        let doc = self.doc;
        for &child in doc.children(id) {
            self.node(child, style);
        }
        if self.carets.contains(&id) {
            self.flush_space(style);
            self.push_char(CARET, Style::default().fg(self.theme.cursor));
        }
    }

    fn node(&mut self, id: NodeId, style: Style) {
        let doc = self.doc;
        let Some(node) = doc.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(raw) => self.text(raw, style),
            NodeKind::Element(element) => self.element(id, element, style),
        }
    }

    fn element(&mut self, id: NodeId, element: &Element, style: Style) {
        if is_skipped(element) {
            return;
        }
        if element.is("br") {
            self.break_line();
            let row = self.row();
            self.rows.insert(id, row);
            self.new_line();
            return;
        }
        if element.leaf {
            return;
        }

        let block = BLOCK_TAGS.contains(&element.tag.as_str());
        if block {
            self.break_line();
        }
        let start = self.row();
        self.rows.insert(id, start);

        let style = self.style_for(id, element, style);
        if element.is("li") {
            let bullet = style.fg(self.theme.dim);
            self.push_char('•', bullet);
            self.pending_space = true;
        }

        self.children(id, style);

        if block {
            self.break_line();
            if element.is("section") {
                self.blank_line();
            }
        }
        let end = self.row().max(start + 1);
        self.extents.insert(id, (start, end));
    }

    fn style_for(&self, id: NodeId, element: &Element, style: Style) -> Style {
        let theme = self.theme;
        let mut style = match element.tag.as_str() {
            "strong" | "b" | "h1" | "h2" | "h3" => style.add_modifier(Modifier::BOLD),
            "em" | "i" => style.add_modifier(Modifier::ITALIC),
            "a" => style.fg(theme.accent).add_modifier(Modifier::UNDERLINED),
            "code" | "pre" => style.fg(theme.code),
            _ => style,
        };

        if element.has_class(PROMPT_CLASS) {
            style = style.fg(theme.prompt).add_modifier(Modifier::BOLD);
        }
        if element.has_class(ACTIVE_CLASS) {
            style = style.fg(theme.accent);
        }
        if self.selected == Some(id) {
            style = style.bg(theme.selection);
        }
        style
    }

    fn text(&mut self, raw: &str, style: Style) {
        for ch in entities::decode(raw).chars() {
            if ch.is_ascii_whitespace() {
                self.pending_space = self.line_width > 0;
                continue;
            }
            self.flush_space(style);
            self.push_char(if ch == '\u{a0}' { ' ' } else { ch }, style);
        }
    }

    fn flush_space(&mut self, style: Style) {
        if self.pending_space {
            self.pending_space = false;
            self.push_char(' ', style);
        }
    }

    fn push_char(&mut self, ch: char, style: Style) {
        let width = ch.width().unwrap_or(1);
        if self.line_width + width > self.width && self.line_width > 0 {
            self.new_line();
            if ch == ' ' {
                return;
            }
        }

        match self.spans.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push(ch),
            _ => self.spans.push(Span::styled(ch.to_string(), style)),
        }
        self.line_width += width;
    }

    /// End the current line if it has content
    fn break_line(&mut self) {
        if self.line_width > 0 {
            self.new_line();
        }
        self.pending_space = false;
    }

    fn new_line(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        self.lines.push(Line::from(spans));
        self.line_width = 0;
        self.pending_space = false;
    }

    /// Separate blocks with one empty line, never more
    fn blank_line(&mut self) {
        self.break_line();
        let last_blank = self.lines.last().is_some_and(|line| line.width() == 0);
        if !self.lines.is_empty() && !last_blank {
            self.new_line();
        }
    }
}

fn is_skipped(element: &Element) -> bool {
    SKIPPED_TAGS.contains(&element.tag.as_str())
        || element.tag.is_empty()
        || element.has_class(HIDDEN_CLASS)
        || element.has_class(HEADER_CLASS)
        || (element.has_class(BUTTON_ROW_CLASS) && !element.has_class(SHOW_CLASS))
}

fn to_row(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(rendered: &RenderedPage) -> Vec<String> {
        rendered
            .lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn render(html: &str, width: u16) -> (Page, RenderedPage) {
        let page = Page::from_html(html);
        let rendered = render_page(&page, [], None, &Theme::default(), width);
        (page, rendered)
    }

    #[test]
    fn test_blocks_break_lines_and_whitespace_collapses() {
        let (_, rendered) = render("<div><p>Hello\n   <b>big</b>  world</p><p>next</p></div>", 80);
        assert_eq!(plain(&rendered), vec!["Hello big world", "next"]);
    }

    #[test]
    fn test_entities_are_decoded() {
        let (_, rendered) = render("<p>a &gt; b &amp;&nbsp;c</p>", 80);
        assert_eq!(plain(&rendered), vec!["a > b & c"]);
    }

    #[test]
    fn test_hidden_and_unshown_button_rows_are_skipped() {
        let (_, rendered) = render(
            r#"<p>shown</p><div class="hidden"><p>no</p></div><p class="btn-row">btn</p><p class="btn-row show">ok</p>"#,
            80,
        );
        assert_eq!(plain(&rendered), vec!["shown", "ok"]);
    }

    #[test]
    fn test_wraps_by_display_width() {
        let (_, rendered) = render("<p>abcdef</p><p>日本語</p>", 4);
        assert_eq!(plain(&rendered), vec!["abcd", "ef", "日本", "語"]);
    }

    #[test]
    fn test_caret_drawn_at_end_of_element() {
        let page = Page::from_html(r#"<p id="a">typ</p>"#);
        let p = page.doc.find_by_id("a").unwrap();
        let rendered = render_page(&page, [p], None, &Theme::default(), 80);
        assert_eq!(plain(&rendered), vec!["typ_"]);
    }

    #[test]
    fn test_caret_in_empty_element() {
        let page = Page::from_html(r#"<p id="a"></p>"#);
        let p = page.doc.find_by_id("a").unwrap();
        let rendered = render_page(&page, [p], None, &Theme::default(), 80);
        assert_eq!(plain(&rendered), vec!["_"]);
    }

    #[test]
    fn test_command_rows_and_hit_testing() {
        let (page, rendered) = render(
            r#"<section><div class="command" data-target="a"><span class="prompt">me &gt;</span> one</div><div id="a" class="hidden"><p>x</p></div></section><section><div class="command" data-target="b">two</div></section>"#,
            80,
        );
        assert_eq!(plain(&rendered), vec!["me > one", "", "two", ""]);
        assert_eq!(rendered.command_at(0), Some(0));
        assert_eq!(rendered.command_at(1), None);
        assert_eq!(rendered.command_at(2), Some(1));

        let section = page.section_of(&page.commands[1]).unwrap();
        assert_eq!(rendered.row_of(section), Some(2));
    }

    #[test]
    fn test_list_items_get_bullets() {
        let (_, rendered) = render("<ul><li>one</li><li>two</li></ul>", 80);
        assert_eq!(plain(&rendered), vec!["• one", "• two"]);
    }

    #[test]
    fn test_sample_page_skips_header_and_hidden_outputs() {
        let page = Page::sample();
        let rendered = render_page(&page, [], None, &Theme::default(), 80);
        let lines = plain(&rendered);
        assert_eq!(lines[0], "user@portfolio > cat about_me.txt");
        assert!(!lines.iter().any(|l| l.contains("Alex")));
        assert_eq!(rendered.command_at(0), Some(0));
    }
}
