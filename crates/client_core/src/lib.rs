use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// The three items the overview page always lists.
const THINGS_TO_SHOW: [&str; 3] = ["HTML5 Boilerplate", "AngularJS", "Karma"];

/// HTTP capability the overview controller fetches through.
#[async_trait]
pub trait DocsGateway: Send + Sync {
    /// Fetch the documentation index from the backing API.
    async fn fetch_index(&self) -> Result<Value>;
}

pub struct MissingDocsGateway;

#[async_trait]
impl DocsGateway for MissingDocsGateway {
    async fn fetch_index(&self) -> Result<Value> {
        Err(anyhow!("docs backend is unavailable"))
    }
}

/// Gateway backed by a real HTTP client.
pub struct HttpDocsGateway {
    http: Client,
    server_url: String,
}

impl HttpDocsGateway {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: server_url.into(),
        }
    }
}

#[async_trait]
impl DocsGateway for HttpDocsGateway {
    async fn fetch_index(&self) -> Result<Value> {
        let body = self
            .http
            .get(format!("{}/docs/v1/", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }
}

/// Escapes text for the surface it will be displayed on.
///
/// Escaping happens at render time only; the scope always stores the API
/// payload verbatim.
pub trait ContentEscaper: Send + Sync {
    fn escape(&self, raw: &str) -> String;
}

pub struct HtmlEscaper;

impl ContentEscaper for HtmlEscaper {
    fn escape(&self, raw: &str) -> String {
        let mut escaped = String::with_capacity(raw.len());
        for ch in raw.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }
}

pub struct PassthroughEscaper;

impl ContentEscaper for PassthroughEscaper {
    fn escape(&self, raw: &str) -> String {
        raw.to_string()
    }
}

/// Data context bound to the overview view.
///
/// Serializes with the view-layer field names: `thingsToShow` and `apiData`,
/// the latter omitted while no response has arrived.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewScope {
    pub things_to_show: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_data: Option<Value>,
}

pub struct OverviewController<E: ContentEscaper> {
    gateway: Arc<dyn DocsGateway>,
    escaper: E,
    pub scope: OverviewScope,
}

impl<E: ContentEscaper> OverviewController<E> {
    pub fn new(gateway: Arc<dyn DocsGateway>, escaper: E) -> Self {
        Self {
            gateway,
            escaper,
            scope: OverviewScope {
                things_to_show: THINGS_TO_SHOW.iter().map(|s| s.to_string()).collect(),
                api_data: None,
            },
        }
    }

    /// Run the one-shot fetch that backs the overview page.
    ///
    /// On success the response body lands on the scope verbatim, without
    /// validation or transformation. A failed request (connection error or
    /// non-2xx status, not distinguished) leaves the scope exactly as it
    /// was; the failure is recorded on the log and never propagates to the
    /// caller.
    pub async fn activate(&mut self) {
        match self.gateway.fetch_index().await {
            Ok(body) => {
                self.scope.api_data = Some(body);
            }
            Err(error) => {
                warn!(%error, "docs index fetch failed; overview keeps its previous state");
            }
        }
    }

    /// Render the scope for display, one line per item, escaped for the
    /// target surface.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .scope
            .things_to_show
            .iter()
            .map(|thing| self.escaper.escape(thing))
            .collect();

        if let Some(data) = &self.scope.api_data {
            let pretty =
                serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
            lines.push(self.escaper.escape(&pretty));
        }

        lines
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
