//! Newswire - an RSS news aggregation API
//!
//! This crate fetches RSS/Atom feeds from a configured set of news sources,
//! optionally enriches each entry with full article text and keywords, and
//! serves the aggregated result over a small JSON API.

pub mod aggregator;
pub mod config;
pub mod enrich;
pub mod fetcher;
pub mod routes;
