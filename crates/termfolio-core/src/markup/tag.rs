/// Elements that never hold children
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Parsed view of one opening tag literal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagInfo {
    /// Lowercase tag name; empty for `<!...>` and `<?...>` declarations
    pub name: String,
    /// Attributes in source order, names lowercased, values undecoded
    pub attrs: Vec<(String, String)>,
    /// Ends with `/>`
    pub self_closing: bool,
}

impl TagInfo {
    /// Parse a tag literal such as `<a href="x" class='y' hidden>`
    ///
    /// Never fails; anything unexpected simply yields fewer attributes.
    pub fn parse(markup: &str) -> Self {
        let inner = markup
            .strip_prefix('<')
            .unwrap_or(markup)
            .strip_suffix('>')
            .unwrap_or(markup.trim_start_matches('<'));

        if inner.starts_with('!') || inner.starts_with('?') {
            return Self::default();
        }

        let inner = inner.trim_start_matches('/');
        let self_closing = inner.trim_end().ends_with('/');
        let body = inner.trim_end().trim_end_matches('/');

        let name_end = body
            .find(|c: char| c.is_whitespace())
            .unwrap_or(body.len());
        let name = body[..name_end].to_ascii_lowercase();
        let attrs = parse_attrs(&body[name_end..]);

        Self {
            name,
            attrs,
            self_closing,
        }
    }

    /// Tag that is inserted as a leaf: void element, `/>` or a declaration
    pub fn is_leaf(&self) -> bool {
        self.self_closing || self.name.is_empty() || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn parse_attrs(mut rest: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(quote) {
                        Some(end) => {
                            rest = &body[end + 1..];
                            body[..end].to_string()
                        }
                        None => {
                            rest = "";
                            body.to_string()
                        }
                    }
                }
                _ => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    rest = &after_eq[end..];
                    after_eq[..end].to_string()
                }
            }
        } else {
            String::new()
        };

        // A stray `=value` has no name; its value was still consumed above
        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_tag() {
        let tag = TagInfo::parse("<strong>");
        assert_eq!(tag.name, "strong");
        assert!(tag.attrs.is_empty());
        assert!(!tag.is_leaf());
    }

    #[test]
    fn test_parse_attributes() {
        let tag = TagInfo::parse(
            r#"<div class="command active" data-target='about' id=cmd1 hidden>"#,
        );
        assert_eq!(tag.name, "div");
        assert_eq!(tag.attr("class"), Some("command active"));
        assert_eq!(tag.attr("data-target"), Some("about"));
        assert_eq!(tag.attr("id"), Some("cmd1"));
        assert_eq!(tag.attr("hidden"), Some(""));
        assert_eq!(tag.attr("missing"), None);
    }

    #[test]
    fn test_uppercase_names_are_lowered() {
        let tag = TagInfo::parse(r#"<A HREF="x">"#);
        assert_eq!(tag.name, "a");
        assert_eq!(tag.attr("href"), Some("x"));
    }

    #[test]
    fn test_leaf_tags() {
        assert!(TagInfo::parse("<br>").is_leaf());
        assert!(TagInfo::parse("<BR>").is_leaf());
        assert!(TagInfo::parse("<img src='a.png'>").is_leaf());
        assert!(TagInfo::parse("<span/>").is_leaf());
        assert!(TagInfo::parse("<span />").is_leaf());
        assert!(TagInfo::parse("<!-- comment -->").is_leaf());
        assert!(TagInfo::parse("<!DOCTYPE html>").is_leaf());
        assert!(!TagInfo::parse("<li>").is_leaf());
    }

    #[test]
    fn test_unterminated_quote_keeps_rest() {
        let tag = TagInfo::parse(r#"<a title="open>"#);
        assert_eq!(tag.attr("title"), Some("open"));
    }

    #[test]
    fn test_slash_in_unquoted_value_is_not_self_closing() {
        let tag = TagInfo::parse("<a href=/about>");
        assert_eq!(tag.attr("href"), Some("/about"));
        assert!(!tag.self_closing);
    }
}
