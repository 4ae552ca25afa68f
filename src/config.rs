use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::feed::is_url;

pub const DEFAULT_FEED_URL: &str = "https://raw.githubusercontent.com/Lastofthefirst/farzam/main/feed";
pub const DEFAULT_REVALIDATE_SECS: u64 = 10;

/// Site-wide settings for page generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// RSS feed the episode pages are generated from
    pub feed_url: String,
    /// Title of the index page
    pub title: String,
    /// Meta description of the index page
    pub description: String,
    /// Appended to episode page titles
    pub author: String,
    /// Seconds between regenerations in watch mode
    pub revalidate_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            title: "The Intellectual Life of the Bahá’í Community - Our contributions to \
                    the advancement of knowledge and civilization."
                .to_string(),
            description: "A talk from Dr. Farzam Arbab about, our contributions to the \
                          advancement of knowledge and civilization."
                .to_string(),
            author: "Farzam Arbab".to_string(),
            revalidate_secs: DEFAULT_REVALIDATE_SECS,
        }
    }
}

impl SiteConfig {
    /// Load settings from a JSON file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the feed URL is an absolute http(s) URL and the interval is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_url(&self.feed_url) {
            return Err(ConfigError::UnsupportedFeedUrl(self.feed_url.clone()));
        }
        Url::parse(&self.feed_url)?;

        if self.revalidate_secs == 0 {
            return Err(ConfigError::InvalidRevalidateInterval);
        }

        Ok(())
    }

    pub fn revalidate_interval(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        let config = SiteConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.revalidate_interval(), Duration::from_secs(10));
    }

    #[test]
    fn load_fills_missing_keys_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.config.json");
        std::fs::write(
            &path,
            r#"{"feed_url": "https://example.com/feed.xml", "revalidate_secs": 60}"#,
        )
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();

        assert_eq!(config.feed_url, "https://example.com/feed.xml");
        assert_eq!(config.revalidate_secs, 60);
        assert_eq!(config.author, SiteConfig::default().author);
    }

    #[test]
    fn load_rejects_relative_feed_url() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.config.json");
        std::fs::write(&path, r#"{"feed_url": "feed.xml"}"#).unwrap();

        let result = SiteConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::UnsupportedFeedUrl(_))));
    }

    #[test]
    fn load_rejects_zero_interval() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.config.json");
        std::fs::write(&path, r#"{"revalidate_secs": 0}"#).unwrap();

        let result = SiteConfig::load(&path);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRevalidateInterval)
        ));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("site.config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = SiteConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseFailed { .. })));
    }

    #[test]
    fn load_nonexistent_returns_error() {
        let dir = tempdir().unwrap();
        let result = SiteConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }
}
