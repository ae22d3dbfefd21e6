use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;
use crate::enrich::{Enricher, Enrichment};
use crate::fetcher::{Fetcher, RawEntry};

/// One aggregated news entry, ready for serialization. `published` renders
/// as an RFC 3339 string; `html` and `keywords` appear only when enrichment
/// ran for the entry.
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub source: String,
    pub title: String,
    pub subtitle: String,
    pub link: String,
    pub published: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// Result of one aggregation pass across all sources.
#[derive(Debug, Default)]
pub struct Aggregated {
    pub items: Vec<NewsItem>,
    /// True when at least one source failed and its entries were omitted.
    pub partial: bool,
}

pub struct Aggregator {
    config: Arc<Config>,
    fetcher: Fetcher,
    enricher: Enricher,
}

impl Aggregator {
    pub fn new(config: Arc<Config>) -> Self {
        let fetcher = Fetcher::new();
        let enricher = Enricher::new(fetcher.client().clone());

        Self {
            config,
            fetcher,
            enricher,
        }
    }

    /// Fetch every registered source in turn, keeping the first
    /// `per_source_limit` entries of each. A failing source is logged and
    /// omitted so it cannot take the whole response down with it.
    pub async fn aggregate(&self) -> Aggregated {
        let mut aggregated = Aggregated::default();

        for source in &self.config.sources {
            let entries = match self.fetcher.fetch_entries(&source.url).await {
                Ok(entries) => entries,
                Err(e) => {
                    error!("Failed to fetch feed '{}': {}", source.id, e);
                    aggregated.partial = true;
                    continue;
                }
            };

            for entry in entries.into_iter().take(self.config.per_source_limit) {
                let enrichment = if self.config.enrich {
                    // Entries without a link still get the HTML fragment,
                    // just with an empty body.
                    if entry.link.is_empty() {
                        Some(Enrichment::default())
                    } else {
                        Some(self.enricher.enrich(&entry.link).await)
                    }
                } else {
                    None
                };

                aggregated
                    .items
                    .push(build_item(&source.id, entry, enrichment));
            }
        }

        info!(
            "Aggregated {} items from {} sources{}",
            aggregated.items.len(),
            self.config.sources.len(),
            if aggregated.partial {
                " (partial)"
            } else {
                ""
            }
        );

        aggregated
    }
}

/// Assemble a `NewsItem` from a raw entry and its optional enrichment.
pub fn build_item(source: &str, entry: RawEntry, enrichment: Option<Enrichment>) -> NewsItem {
    let (html, keywords) = match enrichment {
        Some(enrichment) => {
            let mut html = format!("<h1>{}</h1>", entry.title);
            if !entry.summary.is_empty() {
                html.push_str(&format!("<h2>{}</h2>", entry.summary));
            }
            html.push_str(&format!("<p>{}</p>", enrichment.text));

            (Some(html), Some(enrichment.keywords))
        }
        None => (None, None),
    };

    NewsItem {
        source: source.to_string(),
        title: entry.title,
        subtitle: entry.summary,
        link: entry.link,
        published: entry.published,
        html,
        keywords,
    }
}

/// Sort items newest-first by their parsed published instant.
pub fn sort_newest_first(items: &mut [NewsItem]) {
    items.sort_by(|a, b| b.published.cmp(&a.published));
}

/// Keep only items published on `today` (UTC). The date is a parameter so
/// callers and tests can pin the clock.
pub fn filter_today(items: Vec<NewsItem>, today: NaiveDate) -> Vec<NewsItem> {
    items
        .into_iter()
        .filter(|item| item.published.date_naive() == today)
        .collect()
}
