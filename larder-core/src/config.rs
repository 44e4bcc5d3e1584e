//! Configuration management
//!
//! settings.json format:
//! ```json
//! {
//!   "app": { "demoMode": false, "currentUser": "alice", "alertWindowDays": 7 },
//!   "vision": { "model": "gpt-4.1-mini", "timeoutSeconds": 30 }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    vision: VisionSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(default)]
    current_user: Option<String>,
    #[serde(default)]
    alert_window_days: Option<i64>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Vision API settings stored under the "vision" key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionSettings {
    #[serde(default = "default_vision_model")]
    pub model: String,
    #[serde(default = "default_vision_timeout")]
    pub timeout_seconds: u64,
    /// Override for testing against a local mock server
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_vision_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_vision_timeout() -> u64 {
    30
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            model: default_vision_model(),
            timeout_seconds: default_vision_timeout(),
            base_url: None,
        }
    }
}

/// Number of days ahead of today that counts as "expiring soon"
pub const DEFAULT_ALERT_WINDOW_DAYS: i64 = 7;

/// Larder configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub demo_mode: bool,
    /// Username of the currently logged-in user, if any
    pub current_user: Option<String>,
    pub alert_window_days: i64,
    pub vision: VisionSettings,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            demo_mode: false,
            current_user: None,
            alert_window_days: DEFAULT_ALERT_WINDOW_DAYS,
            vision: VisionSettings::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the larder directory
    ///
    /// Demo mode can be enabled via:
    /// 1. Settings file (larder demo on)
    /// 2. Environment variable LARDER_DEMO_MODE (for CI/testing)
    pub fn load(larder_dir: &Path) -> Result<Self> {
        let settings_path = larder_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Check env var for demo mode override (for CI/testing)
        let demo_mode = match std::env::var("LARDER_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        Ok(Self {
            demo_mode,
            current_user: raw.app.current_user.clone(),
            alert_window_days: raw
                .app
                .alert_window_days
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_ALERT_WINDOW_DAYS),
            vision: raw.vision.clone(),
            _raw_settings: raw,
        })
    }

    /// Save config to the larder directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, larder_dir: &Path) -> Result<()> {
        let settings_path = larder_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        // Update only the fields we manage
        settings.app.demo_mode = self.demo_mode;
        settings.app.current_user = self.current_user.clone();
        settings.app.alert_window_days = Some(self.alert_window_days);
        settings.vision = self.vision.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// Record a successful login
    pub fn set_current_user(&mut self, username: &str) {
        self.current_user = Some(username.to_string());
    }

    /// Clear the session
    pub fn clear_current_user(&mut self) {
        self.current_user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(!config.demo_mode);
        assert!(config.current_user.is_none());
        assert_eq!(config.alert_window_days, DEFAULT_ALERT_WINDOW_DAYS);
        assert_eq!(config.vision.model, "gpt-4.1-mini");
        assert_eq!(config.vision.timeout_seconds, 30);
    }

    #[test]
    fn test_save_preserves_unmanaged_keys() {
        let dir = TempDir::new().unwrap();
        let settings_path = dir.path().join("settings.json");
        std::fs::write(
            &settings_path,
            r#"{"app": {"demoMode": false, "theme": "dark"}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.enable_demo_mode();
        config.set_current_user("alice");
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(&settings_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["app"]["demoMode"], true);
        assert_eq!(value["app"]["currentUser"], "alice");
        assert_eq!(value["app"]["theme"], "dark");
    }

    #[test]
    fn test_roundtrip_current_user() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::load(dir.path()).unwrap();
        config.set_current_user("bob");
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(reloaded.current_user.as_deref(), Some("bob"));

        let mut config = reloaded;
        config.clear_current_user();
        config.save(dir.path()).unwrap();
        let reloaded = Config::load(dir.path()).unwrap();
        assert!(reloaded.current_user.is_none());
    }

    #[test]
    fn test_invalid_alert_window_falls_back() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"alertWindowDays": -3}}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.alert_window_days, DEFAULT_ALERT_WINDOW_DAYS);
    }
}
