use serde::Deserialize;

/// Main configuration structure for docstitch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the documentation site (e.g., "https://textual.textualize.io")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of an index page whose navigation lists the pages to scrape.
    /// When absent, the static `[[pages]]` list must be provided.
    #[serde(rename = "index-path")]
    pub index_path: Option<String>,

    /// CSS selector for the main content container on each page
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,

    /// CSS selector for the navigation container on the index page
    #[serde(rename = "nav-selector", default = "default_nav_selector")]
    pub nav_selector: String,
}

/// HTTP fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the output file is written into (created if absent)
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Name of the output markdown file
    #[serde(default = "default_output_filename")]
    pub filename: String,

    /// Document title, used in the frontmatter and as the top-level heading
    pub title: String,
}

/// A single page to scrape: a title plus its URL
///
/// The URL may be absolute or relative to the site's base URL.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    pub title: String,
    pub url: String,
}

fn default_content_selector() -> String {
    "article.md-content__inner".to_string()
}

fn default_nav_selector() -> String {
    "nav.md-nav--primary".to_string()
}

fn default_user_agent() -> String {
    format!("docstitch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_output_directory() -> String {
    "reference_docs".to_string()
}

fn default_output_filename() -> String {
    "reference.md".to_string()
}
