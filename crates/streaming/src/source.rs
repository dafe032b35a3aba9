//! Async record fetching seam.
//!
//! The dashboard talks to catalog, record and observation endpoints only
//! through `RecordSource`, so the HTTP client lives in the app and tests can
//! substitute canned payloads.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use formats::{FeatureCollection, TilesetManifest};
use serde_json::Value;

/// Error type for record fetches.
#[derive(Debug)]
pub struct FetchError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source of GeoJSON pages, single records and tileset manifests.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait RecordSource: Send + Sync {
    fn fetch_collection(&self, url: &str) -> BoxFuture<'_, Result<FeatureCollection, FetchError>>;

    /// Single record detail; returned as raw JSON since records are shown
    /// verbatim.
    fn fetch_record(&self, url: &str) -> BoxFuture<'_, Result<Value, FetchError>>;

    fn fetch_tileset(&self, url: &str) -> BoxFuture<'_, Result<TilesetManifest, FetchError>>;
}

/// Canned responses keyed by exact URL. Unknown URLs fail like a 404.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecordSource {
    documents: BTreeMap<String, Value>,
}

impl MemoryRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Value) -> &mut Self {
        self.documents.insert(url.into(), document);
        self
    }

    fn lookup(&self, url: &str) -> Result<Value, FetchError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::new(format!("HTTP 404 for {url}")))
    }

    fn decode<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let doc = self.lookup(url)?;
        serde_json::from_value(doc)
            .map_err(|e| FetchError::with_source(format!("invalid document at {url}"), e))
    }
}

impl RecordSource for MemoryRecordSource {
    fn fetch_collection(&self, url: &str) -> BoxFuture<'_, Result<FeatureCollection, FetchError>> {
        let result = self.decode(url);
        Box::pin(async move { result })
    }

    fn fetch_record(&self, url: &str) -> BoxFuture<'_, Result<Value, FetchError>> {
        let result = self.lookup(url);
        Box::pin(async move { result })
    }

    fn fetch_tileset(&self, url: &str) -> BoxFuture<'_, Result<TilesetManifest, FetchError>> {
        let result = self.decode(url);
        Box::pin(async move { result })
    }
}
