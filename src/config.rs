use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Listening port; the PORT environment variable overrides this
    #[serde(default = "default_port")]
    pub port: u16,
    /// Number of entries kept per source on each aggregation pass
    #[serde(default = "default_per_source_limit")]
    pub per_source_limit: usize,
    /// Whether to fetch full article text and keywords for every entry
    #[serde(default = "default_enrich")]
    pub enrich: bool,
    /// CORS origins allowed to call the API; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

fn default_port() -> u16 {
    8000
}

fn default_per_source_limit() -> usize {
    5
}

fn default_enrich() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub id: String,
    pub url: String,
}

impl SourceConfig {
    fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
        }
    }
}

/// The built-in registry, used when no config file names any sources.
fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig::new("bbc", "http://feeds.bbci.co.uk/news/rss.xml"),
        SourceConfig::new("cnn", "http://rss.cnn.com/rss/edition.rss"),
        SourceConfig::new("reuters", "http://feeds.reuters.com/reuters/topNews"),
        SourceConfig::new("theverge", "https://www.theverge.com/rss/index.xml"),
        SourceConfig::new("engadget", "https://www.engadget.com/rss.xml"),
        SourceConfig::new(
            "nytimes",
            "https://rss.nytimes.com/services/xml/rss/nyt/HomePage.xml",
        ),
        SourceConfig::new("guardian", "https://www.theguardian.com/world/rss"),
        SourceConfig::new("aljazeera", "https://www.aljazeera.com/xml/rss/all.xml"),
        SourceConfig::new(
            "washingtonpost",
            "http://feeds.washingtonpost.com/rss/world",
        ),
        SourceConfig::new("apnews", "https://apnews.com/rss/apf-topnews"),
        SourceConfig::new("npr", "https://feeds.npr.org/1001/rss.xml"),
        SourceConfig::new("abcnews", "https://abcnews.go.com/abcnews/topstories"),
        SourceConfig::new("foxnews", "http://feeds.foxnews.com/foxnews/latest"),
        SourceConfig::new("cbc", "https://www.cbc.ca/cmlink/rss-topstories"),
        SourceConfig::new("skynews", "https://feeds.skynews.com/feeds/rss/world.xml"),
        SourceConfig::new("hackernews", "https://hnrss.org/frontpage"),
        SourceConfig::new("techcrunch", "http://feeds.feedburner.com/TechCrunch/"),
        SourceConfig::new("wired", "https://www.wired.com/feed/rss"),
        SourceConfig::new(
            "bloomberg",
            "https://www.bloomberg.com/feed/podcast/etf-report.xml",
        ),
        SourceConfig::new("financialtimes", "https://www.ft.com/?format=rss"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            per_source_limit: default_per_source_limit(),
            enrich: default_enrich(),
            allowed_origins: Vec::new(),
            sources: default_sources(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load a config file, or fall back to the built-in registry when the
    /// file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
