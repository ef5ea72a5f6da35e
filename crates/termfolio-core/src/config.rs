use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub startup: StartupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// HTML page to animate; the built-in sample page is used when unset
    #[serde(default)]
    pub page: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            page: None,
        }
    }
}

/// Animation timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between printed text characters
    #[serde(default = "default_base_char_delay")]
    pub base_char_delay_ms: u64,
    /// Delay between prompt erase/retype characters
    #[serde(default = "default_prompt_delay")]
    pub prompt_delay_ms: u64,
    /// Rows advanced per scroll frame
    #[serde(default = "default_scroll_step")]
    pub scroll_step_rows: u16,
    /// Rows left above the command when auto-scrolling to it
    #[serde(default = "default_scroll_margin")]
    pub scroll_margin_rows: u16,
    /// Scroll frame rate
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            base_char_delay_ms: default_base_char_delay(),
            prompt_delay_ms: default_prompt_delay(),
            scroll_step_rows: default_scroll_step(),
            scroll_margin_rows: default_scroll_margin(),
            animation_fps: default_animation_fps(),
        }
    }
}

impl TimingConfig {
    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.base_char_delay_ms)
    }

    pub fn prompt_delay(&self) -> Duration {
        Duration::from_millis(self.prompt_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Window title shown in the title bar
    #[serde(default = "default_title")]
    pub title: String,
    /// Optional color overrides
    #[serde(default)]
    pub colors: ThemeColorOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            title: default_title(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

/// Optional color overrides for theme customization
/// Each color is a hex string (e.g., "#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Window background
    pub background: Option<String>,
    /// Body text
    pub foreground: Option<String>,
    /// Prompt label
    pub prompt: Option<String>,
    /// Active command and links
    pub accent: Option<String>,
    /// Caret
    pub cursor: Option<String>,
    /// Title bar and borders
    pub chrome: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    /// Output id opened automatically after startup (empty = none)
    #[serde(default = "default_auto_open")]
    pub auto_open: String,
    /// Delay before the auto-open toggle
    #[serde(default = "default_startup_delay")]
    pub delay_ms: u64,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            auto_open: default_auto_open(),
            delay_ms: default_startup_delay(),
        }
    }
}

impl StartupConfig {
    pub fn auto_open_target(&self) -> Option<&str> {
        let target = self.auto_open.trim();
        (!target.is_empty()).then_some(target)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termfolio")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_char_delay() -> u64 {
    5
}

fn default_prompt_delay() -> u64 {
    10
}

fn default_scroll_step() -> u16 {
    1
}

fn default_scroll_margin() -> u16 {
    1
}

fn default_animation_fps() -> u32 {
    60
}

fn default_tick_rate() -> u64 {
    250
}

fn default_title() -> String {
    "user@portfolio: ~".to_string()
}

fn default_auto_open() -> String {
    "about".to_string()
}

fn default_startup_delay() -> u64 {
    300
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, defaults if it does not exist
    pub fn load_from(config_path: &std::path::Path) -> crate::Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/termfolio/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("termfolio")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("termfolio.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the configured page path (with tilde expansion)
    pub fn page_path(&self) -> Option<PathBuf> {
        self.general.page.as_deref().map(expand_tilde)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_script() {
        let config = AppConfig::default();
        assert_eq!(config.timing.base_char_delay_ms, 5);
        assert_eq!(config.timing.prompt_delay_ms, 10);
        assert_eq!(config.timing.scroll_step_rows, 1);
        assert_eq!(config.startup.auto_open_target(), Some("about"));
        assert_eq!(config.startup.delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [timing]
            base_char_delay_ms = 20

            [startup]
            auto_open = ""
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.char_delay(), Duration::from_millis(20));
        assert_eq!(config.timing.prompt_delay_ms, 10);
        assert_eq!(config.startup.auto_open_target(), None);
        assert_eq!(config.ui.title, "user@portfolio: ~");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[timing\nbroken").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_frame_interval_fallback() {
        let timing = TimingConfig {
            animation_fps: 0,
            ..Default::default()
        };
        assert_eq!(timing.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.timing.animation_fps, config.timing.animation_fps);
        assert_eq!(back.general.log_level, config.general.log_level);
    }
}
