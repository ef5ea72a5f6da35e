/// Named entities understood by [`decode`]
const NAMED: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("mdash", "—"),
    ("ndash", "–"),
    ("hellip", "…"),
    ("laquo", "«"),
    ("raquo", "»"),
    ("rsquo", "’"),
    ("lsquo", "‘"),
    ("rdquo", "”"),
    ("ldquo", "“"),
    ("copy", "©"),
    ("middot", "·"),
    ("bull", "•"),
    ("rarr", "→"),
    ("larr", "←"),
];

/// Longest entity body we look for after `&`
const MAX_ENTITY_LEN: usize = 10;

/// Decode character references in raw page text.
///
/// Incomplete or unknown references are kept literally, so text that is
/// still being typed (`&g`) shows as typed.
pub fn decode(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        match decode_one(rest) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Decode the reference at the start of `text` (which begins with `&`)
fn decode_one(text: &str) -> Option<(String, usize)> {
    let semi = text[1..]
        .char_indices()
        .take(MAX_ENTITY_LEN + 1)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i + 1)?;
    let body = &text[1..semi];

    let decoded = if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        char::from_u32(code)?.to_string()
    } else {
        NAMED
            .iter()
            .find(|(name, _)| *name == body)
            .map(|(_, value)| value.to_string())?
    };

    Some((decoded, semi + 1))
}

/// Escape text so it survives as raw page text
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_and_numeric() {
        assert_eq!(decode("a &gt; b &amp;&amp; c"), "a > b && c");
        assert_eq!(decode("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode("&mdash;"), "—");
    }

    #[test]
    fn test_partial_entities_stay_literal() {
        assert_eq!(decode("user &g"), "user &g");
        assert_eq!(decode("&"), "&");
        assert_eq!(decode("&unknown;"), "&unknown;");
        assert_eq!(decode("& gt;"), "& gt;");
        assert_eq!(decode("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_escape_then_decode() {
        let text = "user@portfolio > a & b <c>";
        assert_eq!(decode(&escape(text)), text);
    }

    #[test]
    fn test_multibyte_before_entity() {
        assert_eq!(decode("Привет &amp; мир"), "Привет & мир");
    }
}
