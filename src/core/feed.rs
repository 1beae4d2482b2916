use crate::core::errors::{Error, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Range Feed
-------------------------------------------------------------------------------------------------*/

/// Source of the raw IP range document bytes. The bytes are returned untouched so the caller can
/// verify their digest before parsing.
#[async_trait]
pub trait RangeFeed: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/*-------------------------------------------------------------------------------------------------
  HTTP Range Feed
-------------------------------------------------------------------------------------------------*/

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Retrieves the document with a single HTTP GET. Failures (connection errors, timeouts and
/// non-success status codes) surface as [Error::Transport]; there is no retry.
#[derive(Debug, Clone)]
pub struct HttpRangeFeed {
    client: reqwest::Client,
}

impl HttpRangeFeed {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|error| Error::transport(format!("Failed to build HTTP client: {}", error)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RangeFeed for HttpRangeFeed {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        debug!("Updating from {}", location);

        let response = self.client.get(location).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        info!("Retrieved {} bytes from {}", bytes.len(), location);
        Ok(bytes.to_vec())
    }
}

/*-------------------------------------------------------------------------------------------------
  File Range Feed
-------------------------------------------------------------------------------------------------*/

/// Reads the document from a local file; the location is a filesystem path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRangeFeed;

#[async_trait]
impl RangeFeed for FileRangeFeed {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        debug!("Reading IP ranges from file {}", location);
        std::fs::read(location)
            .map_err(|error| Error::transport(format!("Failed to read {}: {}", location, error)))
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use test_log::test;

    /// Feed that serves canned documents by location.
    #[derive(Debug, Default)]
    pub(crate) struct StaticRangeFeed {
        documents: HashMap<String, Vec<u8>>,
    }

    impl StaticRangeFeed {
        pub(crate) fn with_document(location: &str, document: &str) -> Self {
            let mut documents = HashMap::new();
            documents.insert(location.to_string(), document.as_bytes().to_vec());
            Self { documents }
        }
    }

    #[async_trait]
    impl RangeFeed for StaticRangeFeed {
        async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
            self.documents
                .get(location)
                .cloned()
                .ok_or_else(|| Error::transport(format!("{} is unreachable", location)))
        }
    }

    #[test(tokio::test)]
    async fn test_file_range_feed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"prefixes\": []}").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let bytes = FileRangeFeed.fetch(&path).await.unwrap();
        assert_eq!(bytes, b"{\"prefixes\": []}");
    }

    #[test(tokio::test)]
    async fn test_file_range_feed_missing_file() {
        let result = FileRangeFeed
            .fetch("./scratch/this-file-does-not-exist.json")
            .await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[test(tokio::test)]
    async fn test_http_range_feed_unreachable() {
        let feed = HttpRangeFeed::new().unwrap();
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let result = feed.fetch("http://127.0.0.1:9/ip-ranges.json").await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }

    #[test(tokio::test)]
    async fn test_http_range_feed_invalid_url() {
        let feed = HttpRangeFeed::new().unwrap();
        let result = feed.fetch("not a url").await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
