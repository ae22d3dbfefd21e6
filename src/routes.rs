use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};

use crate::aggregator::{filter_today, sort_newest_first, Aggregator, NewsItem};
use crate::config::Config;

const DOCS_PREVIEW_ITEMS: usize = 5;

pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Aggregator,
}

// Response bodies

#[derive(Serialize)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Serialize)]
pub struct NewsResponse {
    pub news: Vec<NewsItem>,
    pub total: usize,
    pub partial: bool,
}

#[derive(Serialize)]
pub struct TodayResponse {
    pub news: Vec<NewsItem>,
    pub date: String,
    pub count: usize,
    pub partial: bool,
}

// Template structs

#[derive(Template)]
#[template(path = "docs.html")]
pub struct DocsTemplate {
    pub items: Vec<DocsItem>,
}

pub struct DocsItem {
    pub html: String,
    pub source: String,
    pub link: String,
    pub published: String,
    pub keywords: String,
}

impl From<NewsItem> for DocsItem {
    fn from(item: NewsItem) -> Self {
        // Items aggregated without enrichment still need something to show.
        let html = item
            .html
            .unwrap_or_else(|| format!("<h1>{}</h1><h2>{}</h2>", item.title, item.subtitle));

        Self {
            html,
            source: item.source,
            link: item.link,
            published: item.published.to_rfc3339(),
            keywords: item.keywords.unwrap_or_default().join(" , "),
        }
    }
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

/// CORS policy from the configured allow-list; an empty list opens the API
/// to any origin.
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;

        // Credentials cannot be combined with wildcard methods/headers, so
        // the allow-list path names what the API actually serves.
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([axum::http::Method::GET])
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    Ok(layer)
}

// Route handlers

pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the Newswire API!".to_string(),
        endpoints: vec![
            "/".to_string(),
            "/news".to_string(),
            "/news/today".to_string(),
            "/docs".to_string(),
            "/health".to_string(),
        ],
        sources: state
            .config
            .sources
            .iter()
            .map(|source| source.id.clone())
            .collect(),
    })
}

pub async fn news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    let mut aggregated = state.aggregator.aggregate().await;
    sort_newest_first(&mut aggregated.items);

    Json(NewsResponse {
        total: aggregated.items.len(),
        partial: aggregated.partial,
        news: aggregated.items,
    })
}

pub async fn news_today(State(state): State<Arc<AppState>>) -> Json<TodayResponse> {
    let mut aggregated = state.aggregator.aggregate().await;
    sort_newest_first(&mut aggregated.items);

    let today = Utc::now().date_naive();
    let news = filter_today(aggregated.items, today);

    Json(TodayResponse {
        date: today.to_string(),
        count: news.len(),
        partial: aggregated.partial,
        news,
    })
}

pub async fn docs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut aggregated = state.aggregator.aggregate().await;
    sort_newest_first(&mut aggregated.items);

    let items = aggregated
        .items
        .into_iter()
        .take(DOCS_PREVIEW_ITEMS)
        .map(DocsItem::from)
        .collect();

    HtmlTemplate(DocsTemplate { items })
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
