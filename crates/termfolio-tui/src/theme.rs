use ratatui::style::Color;
use termfolio_core::config::ThemeColorOverrides;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub dim: Color,

    pub prompt: Color,
    pub accent: Color,
    pub code: Color,
    pub cursor: Color,

    // Window chrome
    pub chrome: Color,
    pub chrome_bg: Color,
    pub selection: Color,
    pub close: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(0x1e, 0x1e, 0x1e),
            foreground: Color::Rgb(0xd4, 0xd4, 0xd4),
            dim: Color::Rgb(0x80, 0x80, 0x80),
            prompt: Color::Rgb(0x4e, 0xc9, 0xb0),
            accent: Color::Rgb(0x56, 0x9c, 0xd6),
            code: Color::Rgb(0xce, 0x91, 0x78),
            cursor: Color::Rgb(0xd4, 0xd4, 0xd4),
            chrome: Color::Rgb(0xa0, 0xa0, 0xa0),
            chrome_bg: Color::Rgb(0x2d, 0x2d, 0x2d),
            selection: Color::Rgb(0x26, 0x4f, 0x78),
            close: Color::Rgb(0xff, 0x5f, 0x56),
        }
    }
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        // Short form: RGB -> RRGGBB
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Default theme with the user's color overrides applied
pub fn load_theme(overrides: &ThemeColorOverrides) -> Theme {
    let mut theme = Theme::default();

    let slots = [
        (&overrides.background, &mut theme.background),
        (&overrides.foreground, &mut theme.foreground),
        (&overrides.prompt, &mut theme.prompt),
        (&overrides.accent, &mut theme.accent),
        (&overrides.cursor, &mut theme.cursor),
        (&overrides.chrome, &mut theme.chrome),
    ];
    for (hex, slot) in slots {
        match hex.as_deref().map(parse_hex_color) {
            Some(Some(color)) => *slot = color,
            Some(None) => tracing::warn!("Ignoring invalid theme color {:?}", hex),
            None => {}
        }
    }

    theme
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_6digit() {
        let color = parse_hex_color("#ff5500").unwrap();
        assert!(matches!(color, Color::Rgb(255, 85, 0)));
    }

    #[test]
    fn test_parse_hex_color_3digit() {
        let color = parse_hex_color("f50").unwrap();
        assert!(matches!(color, Color::Rgb(255, 85, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert!(parse_hex_color("invalid").is_none());
        assert!(parse_hex_color("#gg0000").is_none());
        assert!(parse_hex_color("#ffé").is_none());
    }

    #[test]
    fn test_load_theme_with_override() {
        let overrides = ThemeColorOverrides {
            prompt: Some("#ff0000".to_string()),
            accent: Some("nope".to_string()),
            ..Default::default()
        };
        let theme = load_theme(&overrides);
        assert!(matches!(theme.prompt, Color::Rgb(255, 0, 0)));
        assert_eq!(theme.accent, Theme::default().accent);
    }
}
