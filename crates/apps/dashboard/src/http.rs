use formats::{FeatureCollection, TilesetManifest};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use streaming::{BoxFuture, FetchError, RecordSource};
use tracing::debug;

/// `RecordSource` over plain HTTP GETs.
#[derive(Debug, Clone, Default)]
pub struct HttpRecordSource {
    client: Client,
}

impl HttpRecordSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::with_source(format!("GET {url} failed"), e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(format!("HTTP {status} for {url}")));
        }
        resp.json::<T>()
            .await
            .map_err(|e| FetchError::with_source(format!("invalid response from {url}"), e))
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch_collection(&self, url: &str) -> BoxFuture<'_, Result<FeatureCollection, FetchError>> {
        let url = url.to_string();
        Box::pin(async move { self.get_json(&url).await })
    }

    fn fetch_record(&self, url: &str) -> BoxFuture<'_, Result<Value, FetchError>> {
        let url = url.to_string();
        Box::pin(async move { self.get_json(&url).await })
    }

    fn fetch_tileset(&self, url: &str) -> BoxFuture<'_, Result<TilesetManifest, FetchError>> {
        let url = url.to_string();
        Box::pin(async move { self.get_json(&url).await })
    }
}
