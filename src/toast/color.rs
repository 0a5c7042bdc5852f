//! Toast background colors: category tokens, explicit overrides and the
//! host palette that turns either into a terminal color.

use ratatui::style::Color;
use regex::Regex;
use serde::Serialize;
use std::str::FromStr;
use std::sync::LazyLock;

use super::options::Category;

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,[^)]*)?\)$")
        .expect("rgb pattern compiles")
});

/// Fixed color tokens the categories map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Green,
    Red,
    Orange,
    Blue,
}

impl From<Category> for ColorToken {
    fn from(category: Category) -> Self {
        match category {
            Category::Success => ColorToken::Green,
            Category::Error => ColorToken::Red,
            Category::Warning => ColorToken::Orange,
            Category::Info => ColorToken::Blue,
        }
    }
}

/// Background color of the toast as configured by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ToastColor {
    Token(ColorToken),
    /// Caller-supplied color expression, applied verbatim.
    Explicit(String),
}

impl ToastColor {
    /// Resolve the color for an `open` call.
    ///
    /// A non-blank explicit color always wins; otherwise the category picks a
    /// token. Returns `None` when neither was supplied.
    pub fn resolve(explicit: Option<&str>, category: Option<Category>) -> Option<Self> {
        if let Some(color) = explicit.map(str::trim).filter(|c| !c.is_empty()) {
            return Some(ToastColor::Explicit(color.to_string()));
        }
        category.map(|c| ToastColor::Token(c.into()))
    }
}

/// Terminal colors the host supplies for the primary color and each token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Background when the toast has no color of its own.
    pub primary: Color,
    pub green: Color,
    pub red: Color,
    pub orange: Color,
    pub blue: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Color::Rgb(0x37, 0x47, 0x4f),
            green: Color::Rgb(0x2e, 0x7d, 0x32),
            red: Color::Rgb(0xc6, 0x28, 0x28),
            orange: Color::Rgb(0xef, 0x6c, 0x00),
            blue: Color::Rgb(0x15, 0x65, 0xc0),
        }
    }
}

impl Palette {
    pub fn token(&self, token: ColorToken) -> Color {
        match token {
            ColorToken::Green => self.green,
            ColorToken::Red => self.red,
            ColorToken::Orange => self.orange,
            ColorToken::Blue => self.blue,
        }
    }

    /// Terminal color for a toast; `None` means the primary color.
    /// Explicit colors that cannot be parsed also fall back to primary.
    pub fn background(&self, color: Option<&ToastColor>) -> Color {
        match color {
            None => self.primary,
            Some(ToastColor::Token(token)) => self.token(*token),
            Some(ToastColor::Explicit(value)) => parse_color(value).unwrap_or_else(|| {
                tracing::warn!(color = %value, "unrecognized toast color, using primary");
                self.primary
            }),
        }
    }
}

/// Parse a color expression: anything ratatui understands (`red`,
/// `#1e88e5`, `lightblue`, `42`), `orange`, or `rgb(r, g, b)`.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("orange") {
        return Some(Color::Rgb(0xff, 0xa5, 0x00));
    }
    if let Ok(color) = Color::from_str(value) {
        return Some(color);
    }

    let caps = RGB_FUNCTION.captures(value)?;
    let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
    Some(Color::Rgb(channel(1)?, channel(2)?, channel(3)?))
}
