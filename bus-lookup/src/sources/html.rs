//! HTML timetable route source.
//!
//! Alternate backend for deployments that only publish a timetable page.
//! Each data row of the first results table is read as
//! `bus | type | departure | arrival | via`; trailing cells may be missing.
//! This is tied to the page markup and is expected to need updating when
//! the upstream site changes.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use super::error::SourceError;
use super::traits::{RouteCandidate, RouteResponse, RouteSource};

static ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr>").unwrap());
static CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td\b[^>]*>(.*?)</td>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)no\s+(buses|routes|results|services)\s+(were\s+)?found|route\s+not\s+found")
        .unwrap()
});
static VIA_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:,|->|→|>|\|)\s*").unwrap());

/// Configuration for the HTML route client.
#[derive(Debug, Clone)]
pub struct HtmlRouteConfig {
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl HtmlRouteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 15,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Route source that scrapes a timetable table.
#[derive(Debug, Clone)]
pub struct HtmlRouteClient {
    http: reqwest::Client,
    base_url: String,
}

impl HtmlRouteClient {
    pub fn new(config: HtmlRouteConfig) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    fn page_url(&self, from: &str, to: &str) -> Result<Url, SourceError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["Find", "source", from, "destination", to]);
        Ok(url)
    }
}

impl RouteSource for HtmlRouteClient {
    async fn routes(&self, from: &str, to: &str) -> Result<RouteResponse, SourceError> {
        let url = self.page_url(from, to)?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(RouteResponse::NotFound);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let page = response.text().await?;
        parse_timetable(&page, from, to)
    }
}

/// Parse a timetable page into route candidates between `from` and `to`.
pub fn parse_timetable(page: &str, from: &str, to: &str) -> Result<RouteResponse, SourceError> {
    let routes: Vec<RouteCandidate> = ROW
        .captures_iter(page)
        .filter_map(|row| {
            let cells: Vec<String> = CELL
                .captures_iter(&row[1])
                .map(|cell| cell_text(&cell[1]))
                .collect();
            row_candidate(&cells, from, to)
        })
        .collect();

    if !routes.is_empty() {
        return Ok(RouteResponse::Found(routes));
    }

    if NOT_FOUND.is_match(&TAG.replace_all(page, " ")) {
        return Ok(RouteResponse::NotFound);
    }

    if !page.to_ascii_lowercase().contains("<table") {
        return Err(SourceError::Html("no timetable in page".to_string()));
    }

    Ok(RouteResponse::Found(Vec::new()))
}

fn row_candidate(cells: &[String], from: &str, to: &str) -> Option<RouteCandidate> {
    if cells.iter().all(|c| c.is_empty()) {
        return None;
    }

    let cell = |i: usize| cells.get(i).filter(|c| !c.is_empty()).cloned();

    // Only a purely numeric label is an id; anything else is a bus number.
    let label = cell(0);
    let id = label.as_deref().and_then(|l| l.parse::<i64>().ok());
    let bus_number = label.filter(|_| id.is_none());

    let category_label = cell(1);
    let is_express = category_label
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains("express") || c.to_lowercase().contains("fast"));

    let stops = cell(4)
        .map(|via| {
            VIA_SEPARATOR
                .split(&via)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(RouteCandidate {
        id,
        from: Some(from.to_string()),
        to: Some(to.to_string()),
        category_label,
        is_express,
        departure: cell(2),
        arrival: cell(3),
        stops,
        bus_number,
        ..RouteCandidate::default()
    })
}

fn cell_text(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    SPACE.replace_all(text.trim(), " ").into_owned()
}
