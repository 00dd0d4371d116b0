use crate::error::ApiError;
use async_trait::async_trait;
use configuration::SourcesConfig;
use core_types::{BASE_CURRENCY, MetalsSnapshot, NewsItem, RateTable};
use serde::de::DeserializeOwned;

pub mod error;
pub mod location;
pub mod responses;
// --- Public API ---
pub use location::SourceLocation;
pub use responses::RatesResponse;

/// The abstract interface for everything the dashboard loads.
/// Each call returns a complete document or an error; nothing is streamed.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetches the price history of every metal plus the rates shipped with it.
    async fn fetch_metals(&self) -> Result<MetalsSnapshot, ApiError>;

    /// Fetches the news headlines. Records with an empty title are dropped.
    async fn fetch_news(&self) -> Result<Vec<NewsItem>, ApiError>;

    /// Fetches a live rate table, or `None` when no rate endpoint is configured.
    async fn fetch_rates(&self) -> Result<Option<RateTable>, ApiError>;
}

/// The concrete source: local files through `tokio::fs`, remote documents
/// and the exchange-rate endpoint through `reqwest`.
#[derive(Clone)]
pub struct DashboardClient {
    client: reqwest::Client,
    metals: SourceLocation,
    news: SourceLocation,
    rates: Option<SourceLocation>,
}

impl DashboardClient {
    pub fn new(config: &SourcesConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("bullion/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            metals: config.metals.parse()?,
            news: config.news.parse()?,
            rates: config.rates_url.as_deref().map(str::parse::<SourceLocation>).transpose()?,
        })
    }

    /// Reads a whole document from its location.
    async fn fetch_text(&self, location: &SourceLocation) -> Result<String, ApiError> {
        tracing::debug!(%location, "Fetching document.");
        match location {
            SourceLocation::Path(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ApiError::Io {
                    path: path.clone(),
                    source,
                }),
            SourceLocation::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                let text = response.text().await?;

                if status.is_success() {
                    Ok(text)
                } else {
                    Err(ApiError::Status(status.as_u16(), text))
                }
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, location: &SourceLocation) -> Result<T, ApiError> {
        let text = self.fetch_text(location).await?;
        serde_json::from_str::<T>(&text)
            .map_err(|e| ApiError::Deserialization(format!("{}: {}", location, e)))
    }
}

#[async_trait]
impl MarketDataSource for DashboardClient {
    async fn fetch_metals(&self) -> Result<MetalsSnapshot, ApiError> {
        let snapshot: MetalsSnapshot = self.fetch_json(&self.metals).await?;
        tracing::info!(
            metals = snapshot.series.len(),
            rates = snapshot.rates.len(),
            "Loaded metals document."
        );
        Ok(snapshot)
    }

    async fn fetch_news(&self) -> Result<Vec<NewsItem>, ApiError> {
        let items: Vec<NewsItem> = self.fetch_json(&self.news).await?;
        let total = items.len();
        let valid: Vec<NewsItem> = items.into_iter().filter(NewsItem::is_valid).collect();
        if valid.len() < total {
            tracing::warn!(dropped = total - valid.len(), "Dropped headlines with an empty title.");
        }
        Ok(valid)
    }

    async fn fetch_rates(&self) -> Result<Option<RateTable>, ApiError> {
        let Some(location) = &self.rates else {
            return Ok(None);
        };

        let response: RatesResponse = self.fetch_json(location).await?;
        if !response.is_success() {
            return Err(ApiError::InvalidData(format!(
                "rate endpoint reported result '{}'",
                response.result.unwrap_or_default()
            )));
        }
        if let Some(base) = response.base.as_deref() {
            if !base.eq_ignore_ascii_case(BASE_CURRENCY) {
                return Err(ApiError::InvalidData(format!(
                    "rates are quoted against {}, expected {}",
                    base, BASE_CURRENCY
                )));
            }
        }
        if response.rates.is_empty() {
            return Err(ApiError::InvalidData("rate endpoint returned no rates".to_string()));
        }

        let table = RateTable::from(response.rates);
        tracing::info!(rates = table.len(), "Loaded live exchange rates.");
        Ok(Some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn client(dir: &TempDir, metals: &str, news: &str, rates: Option<&str>) -> DashboardClient {
        let config = SourcesConfig {
            metals: write(dir.path(), "metals.json", metals),
            news: write(dir.path(), "news.json", news),
            rates_url: rates.map(|body| write(dir.path(), "rates.json", body)),
            ..SourcesConfig::default()
        };
        DashboardClient::new(&config).unwrap()
    }

    const METALS: &str = r#"{"rates": {"USD": 1, "EUR": 0.9}, "gold": [1800.5, 1810.0], "silver": [22.0, 22.5]}"#;
    const NEWS: &str = r#"[{"title": "Gold up", "link": "https://n.test/1"}, {"title": "", "link": "https://n.test/2"}]"#;

    #[rstest]
    #[tokio::test]
    async fn test_fetch_metals_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = client(&dir, METALS, NEWS, None).fetch_metals().await.unwrap();
        assert_eq!(snapshot.metals().collect::<Vec<_>>(), vec!["gold", "silver"]);
        assert_eq!(snapshot.rates.rate("EUR"), 0.9);
    }

    #[rstest]
    #[tokio::test]
    async fn test_fetch_news_drops_untitled_items() {
        let dir = tempfile::tempdir().unwrap();
        let news = client(&dir, METALS, NEWS, None).fetch_news().await.unwrap();
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].title, "Gold up");
    }

    #[rstest]
    #[tokio::test]
    async fn test_rates_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(client(&dir, METALS, NEWS, None).fetch_rates().await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn test_fetch_rates_document() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"result": "success", "base_code": "USD", "rates": {"USD": 1, "GBP": 0.79}}"#;
        let rates = client(&dir, METALS, NEWS, Some(body)).fetch_rates().await.unwrap().unwrap();
        assert_eq!(rates.rate("GBP"), 0.79);
    }

    #[rstest]
    #[case(r#"{"result": "error", "rates": {"GBP": 0.79}}"#)]
    #[case(r#"{"base": "EUR", "rates": {"GBP": 0.85}}"#)]
    #[case(r#"{"rates": {}}"#)]
    #[tokio::test]
    async fn test_unusable_rates_are_errors(#[case] body: &str) {
        let dir = tempfile::tempdir().unwrap();
        let result = client(&dir, METALS, NEWS, Some(body)).fetch_rates().await;
        assert!(matches!(result, Err(ApiError::InvalidData(_))));
    }

    #[rstest]
    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = SourcesConfig {
            metals: dir.path().join("nope.json").to_string_lossy().into_owned(),
            ..SourcesConfig::default()
        };
        let result = DashboardClient::new(&config).unwrap().fetch_metals().await;
        assert!(matches!(result, Err(ApiError::Io { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn test_malformed_metals_document() {
        let dir = tempfile::tempdir().unwrap();
        let result = client(&dir, r#"{"gold": [1.0]}"#, NEWS, None).fetch_metals().await;
        assert!(matches!(result, Err(ApiError::Deserialization(_))));
    }
}
