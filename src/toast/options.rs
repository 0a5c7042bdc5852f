//! Options accepted by [`ToastController::open`](super::ToastController::open).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Named toast category, selecting one of the host's color tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum Category {
    Success,
    Error,
    Warning,
    /// Also the fallback for names that are not recognized.
    #[default]
    Info,
}

impl Category {
    /// Parse a category name (case-insensitive). Unknown names map to `Info`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "success" => Category::Success,
            "error" => Category::Error,
            "warning" => Category::Warning,
            _ => Category::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Success => "success",
            Category::Error => "error",
            Category::Warning => "warning",
            Category::Info => "info",
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::parse(&name)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Category::parse(name)
    }
}

/// Fields of a single `open` call. Every field is optional; anything missing
/// or malformed is skipped and the toast keeps its previous value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenOptions {
    /// Message to display. Empty strings are ignored.
    #[serde(deserialize_with = "lenient_string")]
    pub text: Option<String>,
    /// Auto-dismiss delay in milliseconds for this display only.
    #[serde(deserialize_with = "lenient_millis")]
    pub duration: Option<u64>,
    /// Legacy explicit background color; wins over `category` when non-empty.
    #[serde(alias = "background_color", deserialize_with = "lenient_string")]
    pub background_color: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_category")]
    pub category: Option<Category>,
}

impl OpenOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, millis: u64) -> Self {
        self.duration = Some(millis);
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Parse options from a JSON object such as
    /// `{"text": "Saved", "type": "success", "duration": 2000}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Non-empty message text, if any.
    pub fn message(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }

    /// Auto-dismiss delay, if one was supplied and is positive.
    pub fn auto_dismiss(&self) -> Option<Duration> {
        self.duration
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }

    /// Explicit color override, if one was supplied and is not blank.
    pub fn explicit_color(&self) -> Option<&str> {
        self.background_color
            .as_deref()
            .map(str::trim)
            .filter(|color| !color.is_empty())
    }
}

/// Accepts integers, positive floats and numeric strings. Anything else
/// deserializes to `None` rather than failing the whole options object.
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let millis = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f.round() as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(millis)
}

/// Strings pass through; any other JSON type deserializes to `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// Non-string values are skipped; unknown names still map to `Info`.
fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.map(Category::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_known_names() {
        assert_eq!(Category::parse("success"), Category::Success);
        assert_eq!(Category::parse("ERROR"), Category::Error);
        assert_eq!(Category::parse(" warning "), Category::Warning);
        assert_eq!(Category::parse("info"), Category::Info);
    }

    #[test]
    fn test_category_unknown_falls_back_to_info() {
        assert_eq!(Category::parse("critical"), Category::Info);
        assert_eq!(Category::parse(""), Category::Info);
    }

    #[test]
    fn test_from_json_camel_case() {
        let options = OpenOptions::from_json(
            r##"{"text": "Saved", "duration": 2000, "backgroundColor": "#ff0000", "type": "success"}"##,
        )
        .unwrap();

        assert_eq!(options.message(), Some("Saved"));
        assert_eq!(options.auto_dismiss(), Some(Duration::from_millis(2000)));
        assert_eq!(options.explicit_color(), Some("#ff0000"));
        assert_eq!(options.category, Some(Category::Success));
    }

    #[test]
    fn test_from_json_snake_case_color_alias() {
        let options = OpenOptions::from_json(r#"{"background_color": "green"}"#).unwrap();
        assert_eq!(options.explicit_color(), Some("green"));
    }

    #[test]
    fn test_from_json_unknown_type_is_info() {
        let options = OpenOptions::from_json(r#"{"type": "fatal"}"#).unwrap();
        assert_eq!(options.category, Some(Category::Info));
    }

    #[test]
    fn test_from_json_malformed_duration_is_skipped() {
        let options = OpenOptions::from_json(r#"{"text": "x", "duration": "soon"}"#).unwrap();
        assert_eq!(options.duration, None);

        let options = OpenOptions::from_json(r#"{"duration": -5}"#).unwrap();
        assert_eq!(options.duration, None);

        let options = OpenOptions::from_json(r#"{"duration": "1500"}"#).unwrap();
        assert_eq!(options.duration, Some(1500));
    }

    #[test]
    fn test_from_json_malformed_fields_are_skipped() {
        let options = OpenOptions::from_json(r#"{"text": "x", "type": 5}"#).unwrap();
        assert_eq!(options.message(), Some("x"));
        assert_eq!(options.category, None);

        let options = OpenOptions::from_json(r#"{"text": 5, "type": "error"}"#).unwrap();
        assert_eq!(options.text, None);
        assert_eq!(options.category, Some(Category::Error));

        let options =
            OpenOptions::from_json(r#"{"text": "x", "backgroundColor": 123}"#).unwrap();
        assert_eq!(options.message(), Some("x"));
        assert_eq!(options.explicit_color(), None);

        let options =
            OpenOptions::from_json(r#"{"text": ["a"], "type": {"name": "error"}, "duration": 900}"#)
                .unwrap();
        assert_eq!(options.text, None);
        assert_eq!(options.category, None);
        assert_eq!(options.duration, Some(900));
    }

    #[test]
    fn test_from_json_null_fields_are_absent() {
        let options =
            OpenOptions::from_json(r#"{"text": null, "type": null, "backgroundColor": null}"#)
                .unwrap();
        assert_eq!(options, OpenOptions::default());
    }

    #[test]
    fn test_from_json_ignores_unknown_fields() {
        let options = OpenOptions::from_json(r#"{"text": "hi", "position": "top"}"#).unwrap();
        assert_eq!(options.message(), Some("hi"));
    }

    #[test]
    fn test_zero_duration_is_not_an_override() {
        let options = OpenOptions::new("x").with_duration(0);
        assert_eq!(options.auto_dismiss(), None);
    }

    #[test]
    fn test_empty_text_and_blank_color_are_skipped() {
        let options = OpenOptions::new("").with_background_color("   ");
        assert_eq!(options.message(), None);
        assert_eq!(options.explicit_color(), None);
    }
}
