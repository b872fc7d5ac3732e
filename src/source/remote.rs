//! RemoteSource: HTTP client for the tabular data endpoint

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::SourceConfig;
use crate::error::{ContrastError, ContrastResult};
use crate::source::{TableResponse, TableSource};
use crate::table::{Row, TableKind};

/// Fetches tables from a running data endpoint.
///
/// Each table is requested as `GET <base_url>?sheet=<Table>`.
pub struct RemoteSource {
    base_url: String,
    http_client: Client,
}

impl RemoteSource {
    /// Create a RemoteSource with default client settings.
    ///
    /// # Example
    /// ```no_run
    /// # use contrast::RemoteSource;
    /// let source = RemoteSource::new("https://example.com/macros/exec");
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().to_string(),
            http_client: Client::new(),
        }
    }

    /// Create a RemoteSource whose requests time out after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ContrastResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim().to_string(),
            http_client,
        })
    }

    pub fn from_config(config: &SourceConfig) -> ContrastResult<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ContrastError::Config("source.base_url is not set".to_string()))?;
        Self::with_timeout(base_url, config.timeout())
    }

    /// URL requesting one table
    pub fn table_url(&self, kind: TableKind) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}sheet={}",
            self.base_url,
            separator,
            utf8_percent_encode(kind.sheet_name(), NON_ALPHANUMERIC)
        )
    }
}

#[async_trait]
impl TableSource for RemoteSource {
    async fn fetch_table(&self, kind: TableKind) -> ContrastResult<Vec<Row>> {
        let url = self.table_url(kind);
        debug!("Fetching {} from {}", kind, url);

        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ContrastError::Connection(format!(
                "{} request returned {}",
                kind,
                response.status()
            )));
        }

        let body: TableResponse = response.json().await?;
        body.into_rows(kind)
    }

    fn describe(&self) -> String {
        format!("remote({})", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        let source = RemoteSource::new(" https://example.com/exec ");
        assert_eq!(
            source.table_url(TableKind::RawScorePivot),
            "https://example.com/exec?sheet=RawScorePivot"
        );

        let source = RemoteSource::new("https://example.com/exec?key=abc");
        assert_eq!(
            source.table_url(TableKind::Entities),
            "https://example.com/exec?key=abc&sheet=Entities"
        );
    }

    #[test]
    fn test_from_config_requires_url() {
        let config = SourceConfig::default();
        assert!(matches!(
            RemoteSource::from_config(&config),
            Err(ContrastError::Config(_))
        ));

        let config = SourceConfig {
            base_url: Some("http://localhost:9000/exec".to_string()),
            timeout_secs: 5,
        };
        let source = RemoteSource::from_config(&config).unwrap();
        assert_eq!(source.describe(), "remote(http://localhost:9000/exec)");
    }
}
