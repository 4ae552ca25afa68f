use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when fetching or parsing the episode feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to parse RSS feed: {0}")]
    ParseFailed(#[from] rss::Error),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors that can occur while reading or writing the build manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write manifest {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse manifest JSON in {path}: {source}")]
    JsonParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    JsonSerializeFailed(#[from] serde_json::Error),
}

/// Errors that can occur when loading site configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid feed URL in config: {0}")]
    InvalidFeedUrl(#[from] url::ParseError),

    #[error("Feed URL must be an http(s) URL: {0}")]
    UnsupportedFeedUrl(String),

    #[error("Revalidation interval must be at least one second")]
    InvalidRevalidateInterval,
}

/// Top-level errors for site generation
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write page {path}: {source}")]
    WritePageFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
