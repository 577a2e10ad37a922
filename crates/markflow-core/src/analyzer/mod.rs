//! Page Analyzer - URL in, SEO report out
//!
//! Stateless single request/response analysis: fetch the page, parse the
//! DOM, extract a fixed set of SEO-relevant facts. All errors propagate to
//! the caller; unlike the synthesizer there is no degraded output here,
//! because a diagnostic tool that fails silently hides problems.

pub mod extract;
pub mod report;

pub use report::AnalysisReport;

use markflow_common::config::AnalyzerConfig;
use markflow_common::{Error, Result};
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, info};

/// Page analyzer backed by a shared HTTP client
#[derive(Clone)]
pub struct PageAnalyzer {
    client: Client,
}

impl PageAnalyzer {
    /// Create a new analyzer from configuration.
    ///
    /// The desktop User-Agent matters: sites that block default or empty
    /// agents would otherwise answer 403.
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch and analyze a page.
    ///
    /// Fails with `InvalidInput` when the URL is empty, `Fetch` when the GET
    /// fails or returns a non-2xx status (carrying the upstream status and
    /// text), and `Parse` when extraction aborts. No partial reports.
    pub async fn analyze(&self, url: &str) -> Result<AnalysisReport> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::InvalidInput("URL is required".to_string()));
        }

        debug!(url, "Fetching page for analysis");

        let response = self.client.get(url).send().await.map_err(|e| Error::Fetch {
            // Status 0 means the request never reached the upstream
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Fetch {
                status: status.as_u16(),
                message: format!(
                    "{} {}",
                    status.canonical_reason().unwrap_or("error"),
                    truncate(&text, 256)
                ),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Parse(format!("Failed to read response body: {}", e)))?;

        let document = Html::parse_document(&body);
        let report = extract::extract_report(&document, url);

        info!(
            url,
            h1 = report.headings.h1.len(),
            internal_links = report.links.internal_count,
            external_links = report.links.external_count,
            images = report.images.total,
            "Page analysis complete"
        );

        Ok(report)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn analyzer() -> PageAnalyzer {
        PageAnalyzer::new(&AnalyzerConfig {
            user_agent: "markflow-test/1.0".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_requires_url() {
        let err = analyzer().analyze("  ").await.unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_analyze_sends_user_agent_and_extracts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", "markflow-test/1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><head><title>Example</title></head></html>"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let report = analyzer().analyze(&server.uri()).await.unwrap();
        assert_eq!(report.metadata.title, "Example");
        assert_eq!(report.metadata.description, "");
        assert!(!report.structured_data.present);
    }

    #[tokio::test]
    async fn test_analyze_surfaces_upstream_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = analyzer().analyze(&server.uri()).await.unwrap_err();
        match err {
            Error::Fetch { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains("nope"));
            }
            other => panic!("expected Fetch error, got {:?}", other),
        }
    }
}
