use std::collections::HashMap;

use reqwest::Client;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

pub const MAX_KEYWORDS: usize = 10;

const MIN_TOKEN_LEN: usize = 4;

/// Common words that never make useful keywords.
const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "against", "album", "almost", "along", "already", "also",
    "although", "always", "among", "announced", "another", "anything", "around", "back",
    "based", "because", "been", "before", "being", "between", "both", "called", "came",
    "comes", "could", "does", "doing", "down", "during", "each", "even", "every", "first",
    "from", "gets", "going", "great", "group", "have", "having", "here", "high", "home",
    "into", "just", "know", "last", "latest", "left", "like", "likely", "little",
    "long", "made", "make", "makes", "many", "might", "more", "most", "much", "must",
    "near", "need", "never", "news", "next", "only", "other", "others", "over", "part",
    "people", "report", "right", "said", "same", "says", "several", "should", "since",
    "some", "something", "still", "such", "take", "than", "that", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "time", "times", "today",
    "told", "took", "under", "until", "used", "using", "very", "week", "well", "were",
    "what", "when", "where", "which", "while", "will", "with", "without", "world",
    "would", "year", "years",
];

/// Full text and keywords pulled from an article page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub text: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("article request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct Enricher {
    client: Client,
}

impl Enricher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Best-effort enrichment: any failure collapses to empty text and an
    /// empty keyword list so a broken article page can never abort the
    /// surrounding request.
    pub async fn enrich(&self, url: &str) -> Enrichment {
        match self.try_enrich(url).await {
            Ok(enrichment) => enrichment,
            Err(e) => {
                warn!("Enrichment failed for {}: {}", url, e);
                Enrichment::default()
            }
        }
    }

    async fn try_enrich(&self, url: &str) -> Result<Enrichment, EnrichError> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let text = extract_text(&body);
        let keywords = extract_keywords(&text, MAX_KEYWORDS);
        debug!(
            "Enriched {}: {} bytes of text, {} keywords",
            url,
            text.len(),
            keywords.len()
        );

        Ok(Enrichment { text, keywords })
    }
}

/// Pull readable body text out of an article page. Prefers paragraphs inside
/// an `<article>` element, falling back to all paragraphs on the page.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let article_paragraphs = Selector::parse("article p").unwrap();
    let all_paragraphs = Selector::parse("p").unwrap();

    let mut paragraphs: Vec<String> = document
        .select(&article_paragraphs)
        .map(paragraph_text)
        .filter(|p| !p.is_empty())
        .collect();

    if paragraphs.is_empty() {
        paragraphs = document
            .select(&all_paragraphs)
            .map(paragraph_text)
            .filter(|p| !p.is_empty())
            .collect();
    }

    paragraphs.join("\n\n")
}

/// Collapse a paragraph's text nodes into a single whitespace-normalized line.
fn paragraph_text(paragraph: scraper::ElementRef<'_>) -> String {
    paragraph
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rank the most frequent non-stop-word tokens in `text`. Ties break
/// alphabetically so the result is deterministic.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for token in text.split(|c: char| !c.is_alphanumeric()) {
        if token.len() < MIN_TOKEN_LEN {
            continue;
        }
        if !token.chars().all(|c| c.is_alphabetic()) {
            continue;
        }
        let lower = token.to_lowercase();
        if STOP_WORDS.contains(&lower.as_str()) {
            continue;
        }
        *counts.entry(lower).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ranked.into_iter().take(limit).map(|(word, _)| word).collect()
}
