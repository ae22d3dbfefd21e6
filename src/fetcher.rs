use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::parser;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

/// One feed entry with every field read defensively: absent values fall back
/// to empty strings, an absent published date falls back to `updated` and
/// finally to the current time.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed could not be parsed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Newswire/0.1 (RSS Aggregator)")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// The underlying HTTP client, shared with the article enricher.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetch one feed URL and parse it into raw entries.
    pub async fn fetch_entries(&self, url: &str) -> Result<Vec<RawEntry>, FetchError> {
        debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;
        let bytes = response.bytes().await?;

        entries_from_bytes(&bytes)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a feed document into raw entries, applying the field fallbacks.
pub fn entries_from_bytes(bytes: &[u8]) -> Result<Vec<RawEntry>, FetchError> {
    let parsed = parser::parse(bytes)?;

    let entries = parsed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .as_ref()
                .map(|t| t.content.clone())
                .unwrap_or_default();

            let link = entry
                .links
                .first()
                .map(|l| l.href.clone())
                .unwrap_or_default();

            if link.is_empty() {
                warn!("Feed entry has no link: {}", title);
            }

            let summary = entry
                .summary
                .as_ref()
                .map(|s| s.content.clone())
                .unwrap_or_default();

            let published = entry.published.or(entry.updated).unwrap_or_else(Utc::now);

            RawEntry {
                title,
                link,
                summary,
                published,
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_WITH_DATES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0">
            <channel>
                <title>Tech News</title>
                <link>https://technews.example.com</link>
                <description>Latest tech news</description>
                <item>
                    <title>Breaking: New Technology Announced</title>
                    <link>https://technews.example.com/article/1</link>
                    <description>A big announcement.</description>
                    <pubDate>Mon, 09 Dec 2024 12:00:00 GMT</pubDate>
                </item>
                <item>
                    <title>Review: Latest Gadget</title>
                    <link>https://technews.example.com/article/2</link>
                    <description>Hands on with the gadget.</description>
                    <pubDate>Mon, 09 Dec 2024 10:00:00 GMT</pubDate>
                </item>
            </channel>
        </rss>
    "#;

    #[test]
    fn test_parse_rss_entries() {
        let entries = entries_from_bytes(FEED_WITH_DATES.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Breaking: New Technology Announced");
        assert_eq!(entries[0].link, "https://technews.example.com/article/1");
        assert_eq!(entries[0].summary, "A big announcement.");
        assert_eq!(
            entries[0].published.to_rfc3339(),
            "2024-12-09T12:00:00+00:00"
        );
        assert_eq!(entries[1].title, "Review: Latest Gadget");
    }

    #[test]
    fn test_missing_published_falls_back_to_now() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0">
                <channel>
                    <title>Undated Feed</title>
                    <item>
                        <title>No date here</title>
                        <link>https://example.com/undated</link>
                    </item>
                </channel>
            </rss>
        "#;

        let before = Utc::now();
        let entries = entries_from_bytes(xml.as_bytes()).unwrap();
        let after = Utc::now();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].published >= before);
        assert!(entries[0].published <= after);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0">
                <channel>
                    <title>Sparse Feed</title>
                    <item>
                        <guid>bare-item</guid>
                    </item>
                </channel>
            </rss>
        "#;

        let entries = entries_from_bytes(xml.as_bytes()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "");
        assert_eq!(entries[0].link, "");
        assert_eq!(entries[0].summary, "");
    }

    #[test]
    fn test_atom_updated_used_when_published_absent() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <feed xmlns="http://www.w3.org/2005/Atom">
                <title>Atom Feed</title>
                <id>urn:example:feed</id>
                <updated>2024-12-09T12:00:00Z</updated>
                <entry>
                    <title>Atom Entry</title>
                    <id>urn:example:entry1</id>
                    <link href="https://example.com/atom/1"/>
                    <updated>2024-12-08T09:30:00Z</updated>
                </entry>
            </feed>
        "#;

        let entries = entries_from_bytes(xml.as_bytes()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].published.to_rfc3339(),
            "2024-12-08T09:30:00+00:00"
        );
    }

    #[test]
    fn test_invalid_document_is_an_error() {
        let result = entries_from_bytes(b"not xml at all");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_feed_yields_no_entries() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0">
                <channel>
                    <title>Empty Feed</title>
                </channel>
            </rss>
        "#;

        let entries = entries_from_bytes(xml.as_bytes()).unwrap();
        assert!(entries.is_empty());
    }
}
