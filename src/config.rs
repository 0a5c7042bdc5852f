use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::toast::{parse_color, Palette, ToastController};

/// Tick interval of the terminal front-end when not configured.
pub const DEFAULT_TICK_RATE: Duration = Duration::from_millis(33);

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Length of the open/close transition in milliseconds. Default: 300
    pub transition_duration_ms: Option<u64>,
    /// Auto-dismiss delay when an open call gives none. Default: 5000
    pub default_duration_ms: Option<u64>,
    /// Event loop tick interval in milliseconds. Default: 33
    pub tick_rate_ms: Option<u64>,
    /// Background used when a toast has no category or color.
    /// Example: "#37474f"
    pub primary_color: Option<String>,
    /// Category color tokens.
    pub colors: Option<ColorsConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ColorsConfig {
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub info: Option<String>,
}

impl Config {
    /// Load configuration from ~/.config/toastline/config.toml
    ///
    /// - File missing: returns default config (Ok)
    /// - File exists but invalid TOML: returns Err so caller can show warning
    /// - Field missing, zero or unparseable: uses the default for that field
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn transition_duration(&self) -> Duration {
        positive_millis(
            self.transition_duration_ms,
            crate::toast::DEFAULT_TRANSITION_DURATION,
        )
    }

    pub fn default_duration(&self) -> Duration {
        positive_millis(self.default_duration_ms, crate::toast::DEFAULT_DURATION)
    }

    pub fn tick_rate(&self) -> Duration {
        positive_millis(self.tick_rate_ms, DEFAULT_TICK_RATE)
    }

    /// Palette with configured colors layered over the defaults.
    pub fn palette(&self) -> Palette {
        let mut palette = Palette::default();
        override_color(&mut palette.primary, self.primary_color.as_deref());
        if let Some(colors) = &self.colors {
            override_color(&mut palette.green, colors.success.as_deref());
            override_color(&mut palette.red, colors.error.as_deref());
            override_color(&mut palette.orange, colors.warning.as_deref());
            override_color(&mut palette.blue, colors.info.as_deref());
        }
        palette
    }

    /// A fresh controller using the configured durations.
    pub fn controller(&self) -> ToastController {
        ToastController::new()
            .with_transition_duration(self.transition_duration())
            .with_default_duration(self.default_duration())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|d| d.join(".config").join("toastline").join("config.toml"))
    }
}

fn positive_millis(value: Option<u64>, default: Duration) -> Duration {
    match value {
        Some(ms) if ms > 0 => Duration::from_millis(ms),
        _ => default,
    }
}

fn override_color(slot: &mut ratatui::style::Color, value: Option<&str>) {
    let Some(value) = value else { return };
    match parse_color(value) {
        Some(color) => *slot = color,
        None => tracing::warn!(color = value, "ignoring unparseable color in config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.transition_duration(), Duration::from_millis(300));
        assert_eq!(config.default_duration(), Duration::from_millis(5000));
        assert_eq!(config.tick_rate(), DEFAULT_TICK_RATE);
        assert_eq!(config.palette(), Palette::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(config.transition_duration_ms.is_none());
    }

    #[test]
    fn test_load_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r##"
transition_duration_ms = 500
default_duration_ms = 2500
primary_color = "#010203"

[colors]
error = "magenta"
"##
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.transition_duration(), Duration::from_millis(500));
        assert_eq!(config.default_duration(), Duration::from_millis(2500));

        let palette = config.palette();
        assert_eq!(palette.primary, Color::Rgb(1, 2, 3));
        assert_eq!(palette.red, Color::Magenta);
        assert_eq!(palette.green, Palette::default().green);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "transition_duration_ms = [[[invalid").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let config: Config =
            toml::from_str("transition_duration_ms = 0\ndefault_duration_ms = 0\ntick_rate_ms = 0")
                .unwrap();
        assert_eq!(config.transition_duration(), Duration::from_millis(300));
        assert_eq!(config.default_duration(), Duration::from_millis(5000));
        assert_eq!(config.tick_rate(), DEFAULT_TICK_RATE);
    }

    #[test]
    fn test_unparseable_color_is_ignored() {
        let config: Config = toml::from_str(r#"primary_color = "var(--primary)""#).unwrap();
        assert_eq!(config.palette().primary, Palette::default().primary);
    }

    #[test]
    fn test_controller_uses_configured_durations() {
        let config: Config =
            toml::from_str("transition_duration_ms = 750\ndefault_duration_ms = 1200").unwrap();
        let toast = config.controller();
        assert_eq!(toast.transition_duration(), Duration::from_millis(750));
        assert_eq!(toast.duration(), Duration::from_millis(1200));
    }

    #[test]
    fn test_load_toml_missing_field() {
        let config: Config = toml::from_str("# empty config\n").unwrap();
        assert!(config.colors.is_none());
        assert_eq!(config.transition_duration(), Duration::from_millis(300));
    }
}
