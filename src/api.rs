use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::filter::FilterState;
use crate::models::{AiSummary, CourseScore, FeedbackItem};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorPayload {
    error: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ApiClient {
        ApiClient {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_feedback(&self) -> Result<Vec<FeedbackItem>> {
        let url = format!("{}/api/feedback", self.base_url);
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if !resp.status().is_success() {
            return Err(api_error("feedback", resp).await);
        }

        resp.json().await.context("feedback payload was not valid JSON")
    }

    pub async fn fetch_summaries(&self) -> Result<Vec<AiSummary>> {
        let url = format!("{}/api/ai-summaries", self.base_url);
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if !resp.status().is_success() {
            return Err(api_error("ai-summaries", resp).await);
        }

        resp.json().await.context("ai-summaries payload was not valid JSON")
    }

    pub async fn fetch_course_scores(&self) -> Result<Vec<CourseScore>> {
        let url = format!("{}/api/course-scores", self.base_url);
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if !resp.status().is_success() {
            return Err(api_error("course-scores", resp).await);
        }

        resp.json().await.context("course-scores payload was not valid JSON")
    }

    pub async fn download_export(&self, filters: &FilterState) -> Result<Vec<u8>> {
        let url = format!("{}/api/export", self.base_url);
        let query = export_query(filters);
        log::debug!("GET {url} with {} query params", query.len());
        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if !resp.status().is_success() {
            return Err(api_error("export", resp).await);
        }

        let bytes = resp.bytes().await.context("export download was interrupted")?;
        Ok(bytes.to_vec())
    }

    pub async fn download_export_all(&self) -> Result<Vec<u8>> {
        let url = format!("{}/api/export-all", self.base_url);
        log::debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        if !resp.status().is_success() {
            return Err(api_error("export-all", resp).await);
        }

        let bytes = resp.bytes().await.context("export download was interrupted")?;
        Ok(bytes.to_vec())
    }
}

async fn api_error(what: &str, resp: reqwest::Response) -> anyhow::Error {
    let status = resp.status();
    let body = resp.bytes().await.unwrap_or_default();
    match serde_json::from_slice::<ErrorPayload>(&body) {
        Ok(payload) => anyhow::anyhow!("{what} request returned {status}: {}", payload.error),
        Err(_) => anyhow::anyhow!("{what} request returned {status}"),
    }
}

pub fn export_query(filters: &FilterState) -> Vec<(&'static str, String)> {
    let mut query: Vec<(&'static str, String)> = Vec::new();
    for outcome in filters.sorted_outcomes() {
        query.push(("hc", outcome));
    }
    for course in filters.sorted_courses() {
        query.push(("course", course));
    }
    for term in filters.sorted_terms() {
        query.push(("term", term));
    }
    query.push(("minScore", format_score(filters.min_score)));
    query.push(("maxScore", format_score(filters.max_score)));
    query
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as i64)
    } else {
        score.to_string()
    }
}
