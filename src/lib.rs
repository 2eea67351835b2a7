//! Docstitch: a documentation site stitcher
//!
//! This crate fetches pages from a documentation website, extracts the main
//! content region of each page, converts it to markdown, and concatenates
//! everything into a single markdown file with a generated table of contents.

pub mod assemble;
pub mod config;
pub mod convert;
pub mod discover;
pub mod extract;
pub mod fetch;
pub mod pipeline;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for docstitch operations
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Discovery error: {0}")]
    Discover(#[from] DiscoverError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),
}

/// Errors from fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Unreachable host for {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Content-Type {content_type:?} is not HTML for {url}")]
    NotHtml { url: String, content_type: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors from discovering pages on the index page
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("Navigation container not found (selector: {selector})")]
    NavMissing { selector: String },

    #[error("No page links found in navigation container")]
    NoLinks,
}

/// Errors from extracting content out of a fetched page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Content container not found (selector: {selector})")]
    ContainerMissing { selector: String },

    #[error("Content container has no convertible elements")]
    EmptyContent,
}

/// Errors from writing the final document
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for docstitch operations
pub type Result<T> = std::result::Result<T, StitchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use assemble::{Assembler, DocumentMeta, HeadingEntry, MarkdownSection};
pub use config::Config;
pub use extract::{Block, Inline};
pub use pipeline::{run, PageOutcome, RunReport};
