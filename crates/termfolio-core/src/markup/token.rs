use serde::Serialize;

/// One indivisible unit of tokenized markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    /// A single printed character
    Text { ch: char },
    /// Literal opening tag text, e.g. `<strong class="x">`
    TagOpen { markup: String },
    /// Literal closing tag text, e.g. `</strong>`
    TagClose { markup: String },
}

impl Token {
    /// Build a tag token, classifying it by its `</` prefix
    pub fn tag(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        if markup.starts_with("</") {
            Token::TagClose { markup }
        } else {
            Token::TagOpen { markup }
        }
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text { .. })
    }

    #[inline]
    pub fn is_close(&self) -> bool {
        matches!(self, Token::TagClose { .. })
    }

    /// Append this token's literal form to `out`
    pub fn write_to(&self, out: &mut String) {
        match self {
            Token::Text { ch } => out.push(*ch),
            Token::TagOpen { markup } | Token::TagClose { markup } => out.push_str(markup),
        }
    }
}

/// Concatenate the literal forms of `tokens`
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        token.write_to(&mut out);
    }
    out
}
