//! Widget and server configuration
//!
//! Widget options live in a TOML file (`gplus.toml` by default) with
//! every field defaulted, so an empty or missing file yields a working
//! configuration. Server-level settings come from the environment.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Public people API base URL.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/plus/v1/people";

/// Profile widget options (`[profile]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// User whose profile is shown.
    pub user: String,
    /// Template identifier handed to the template renderer.
    pub template: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            user: "me".to_string(),
            template: "gplus_profile.html".to_string(),
        }
    }
}

/// Activity feed widget options (`[activity]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// User whose public activities are shown.
    pub user: String,
    /// Page size for the activity request.
    pub results: u32,
    /// Template identifier handed to the template renderer.
    pub template: String,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            user: "me".to_string(),
            results: 10,
            template: "gplus_feed.html".to_string(),
        }
    }
}

/// Widget configuration loaded from the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Developer key for public API access. Without it, widgets render
    /// setup instructions instead of data.
    pub app_developer_key: Option<String>,
    /// Cache rendered widget HTML.
    pub cache: bool,
    /// Render placeholders and let the client loader fill them in.
    pub defer: bool,
    /// Mirror remote images to local storage.
    pub files: bool,
    /// Subdirectory (under the files root) for mirrored images.
    pub filedir: String,
    /// API base URL. Overridable for tests and proxies.
    pub api_base: String,
    /// Cache duration in minutes, for both widget HTML and mirrored files.
    pub cache_duration_mins: u64,
    pub profile: ProfileConfig,
    pub activity: ActivityConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            app_developer_key: None,
            cache: true,
            defer: true,
            files: false,
            filedir: "googleplus".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            cache_duration_mins: 10,
            profile: ProfileConfig::default(),
            activity: ActivityConfig::default(),
        }
    }
}

impl WidgetConfig {
    /// Cache duration in seconds.
    pub fn cache_duration_secs(&self) -> u64 {
        self.cache_duration_mins * 60
    }

    /// Developer key, if configured and non-empty.
    pub fn developer_key(&self) -> Option<&str> {
        self.app_developer_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(toml::from_str(&data)?)
    }
}

/// Server settings parsed from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Path of the widget config file.
    pub config_path: PathBuf,
    /// Root directory the public file tree is served from.
    pub files_root: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3002);

        let config_path = std::env::var("GPLUS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("gplus.toml"));

        let files_root = std::env::var("FILES_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./files"));

        Self {
            port,
            config_path,
            files_root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let cfg = WidgetConfig::default();
        assert!(cfg.app_developer_key.is_none());
        assert!(cfg.cache);
        assert!(cfg.defer);
        assert!(!cfg.files);
        assert_eq!(cfg.filedir, "googleplus");
        assert_eq!(cfg.cache_duration_mins, 10);
        assert_eq!(cfg.cache_duration_secs(), 600);
        assert_eq!(cfg.profile.user, "me");
        assert_eq!(cfg.profile.template, "gplus_profile.html");
        assert_eq!(cfg.activity.user, "me");
        assert_eq!(cfg.activity.results, 10);
        assert_eq!(cfg.activity.template, "gplus_feed.html");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            app_developer_key = "AIzaTest"
            cache = false
            defer = false
            files = true
            filedir = "mirrored"

            [profile]
            user = "104560124403688998123"
            template = "my_profile.html"

            [activity]
            user = "104560124403688998123"
            results = 5
        "#;
        let cfg: WidgetConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.developer_key(), Some("AIzaTest"));
        assert!(!cfg.cache);
        assert!(!cfg.defer);
        assert!(cfg.files);
        assert_eq!(cfg.filedir, "mirrored");
        assert_eq!(cfg.profile.user, "104560124403688998123");
        assert_eq!(cfg.profile.template, "my_profile.html");
        assert_eq!(cfg.activity.results, 5);
        // Unset sections keep their defaults
        assert_eq!(cfg.activity.template, "gplus_feed.html");
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_empty_developer_key_counts_as_missing() {
        let cfg: WidgetConfig = toml::from_str("app_developer_key = \"\"").unwrap();
        assert_eq!(cfg.developer_key(), None);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let cfg = WidgetConfig::load(Path::new("/nonexistent/gplus.toml")).unwrap();
        assert!(cfg.cache);
        assert_eq!(cfg.filedir, "googleplus");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gplus.toml");
        std::fs::write(&path, "cache_duration_mins = 3").unwrap();

        let cfg = WidgetConfig::load(&path).unwrap();
        assert_eq!(cfg.cache_duration_secs(), 180);
    }
}
