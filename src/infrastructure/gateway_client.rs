// Sensor gateway client - fetches measurement history over HTTP
use crate::application::measurement_source::MeasurementSource;
use crate::domain::measurement::MeasurementRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("gateway returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn bulk_url(&self, period_secs: i64) -> String {
        format!("{}/measurements/bulk?period={}", self.base_url, period_secs)
    }

    fn newest_url(&self) -> String {
        format!("{}/measurements/newest", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, GatewayError> {
        tracing::debug!(%url, "Fetching from gateway");

        let response = match self.http.get(&url).header("Accept", "application/json").send().await {
            Ok(response) => response,
            Err(source) => return Err(GatewayError::Request { url, source }),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { url, status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GatewayError::Decode { url, source })
    }
}

#[async_trait]
impl MeasurementSource for GatewayClient {
    async fn bulk(&self, period_secs: i64) -> anyhow::Result<Vec<MeasurementRecord>> {
        let records: Vec<MeasurementRecord> = self.get_json(self.bulk_url(period_secs)).await?;
        tracing::debug!(period_secs, records = records.len(), "Fetched measurement history");
        Ok(records)
    }

    async fn newest(&self) -> anyhow::Result<Vec<MeasurementRecord>> {
        Ok(self.get_json(self.newest_url()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = GatewayClient::new("http://gateway.local:3001/api/", Duration::from_secs(5)).unwrap();

        assert_eq!(
            client.bulk_url(259_200),
            "http://gateway.local:3001/api/measurements/bulk?period=259200"
        );
        assert_eq!(client.newest_url(), "http://gateway.local:3001/api/measurements/newest");
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_a_request_error() {
        let client = GatewayClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let err = client.get_json::<Vec<MeasurementRecord>>(client.newest_url()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Request { .. }));
    }
}
