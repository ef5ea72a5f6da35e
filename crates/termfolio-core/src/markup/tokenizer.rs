use super::tag::TagInfo;
use super::token::Token;

/// Elements whose content is never scanned for tags
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Split an HTML fragment into characters and tag literals.
///
/// A `<` starts a tag only when a later `>` exists; otherwise it is printed
/// like any other character. Nothing is decoded or normalized, so
/// `render(&tokenize(s)) == s` for every input.
pub fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(html.len());
    let mut rest = html;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(end) = rest.find('>') {
                tokens.push(Token::tag(&rest[..=end]));
                rest = &rest[end + 1..];
                continue;
            }
        }

        tokens.push(Token::Text { ch });
        rest = &rest[ch.len_utf8()..];
    }

    tokens
}

/// Tokenize a whole page.
///
/// Same as [`tokenize`], except that the content of `<script>` and `<style>`
/// up to the matching close tag is emitted as plain characters. Still
/// lossless.
pub fn tokenize_page(html: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(html.len());
    let mut rest = html;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(end) = rest.find('>') {
                let markup = &rest[..=end];
                tokens.push(Token::tag(markup));
                rest = &rest[end + 1..];

                if let Some(raw_len) = raw_text_len(markup, rest) {
                    tokens.extend(rest[..raw_len].chars().map(|ch| Token::Text { ch }));
                    rest = &rest[raw_len..];
                }
                continue;
            }
        }

        tokens.push(Token::Text { ch });
        rest = &rest[ch.len_utf8()..];
    }

    tokens
}

/// Length of the raw text following `open_markup`, if it opens a raw text element
fn raw_text_len(open_markup: &str, rest: &str) -> Option<usize> {
    if open_markup.starts_with("</") {
        return None;
    }
    let info = TagInfo::parse(open_markup);
    if info.self_closing || !RAW_TEXT_ELEMENTS.contains(&info.name.as_str()) {
        return None;
    }

    // ASCII lowercasing keeps byte offsets
    let close = format!("</{}", info.name);
    let len = rest
        .to_ascii_lowercase()
        .find(&close)
        .unwrap_or(rest.len());
    Some(len)
}
