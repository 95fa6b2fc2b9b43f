//! Image attachment retrieval
//!
//! Fetching is a soft-failure boundary: callers get `None` for anything that
//! went wrong and render a fallback line instead of the picture.

use crate::config::FetchConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::Client;
use tracing::{debug, warn};

/// Retrieves attachment bytes for embedding
pub trait ImageFetcher: Send + Sync {
    /// Fetch the bytes behind `url`, or `None` when unavailable
    fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// Fetcher that never returns an image
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopImageFetcher;

impl ImageFetcher for NoopImageFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        debug!("Image fetching disabled, skipping {}", url);
        None
    }
}

/// HTTP fetcher that also understands inline `data:` URLs
pub struct HttpImageFetcher {
    client: Option<Client>,
}

impl HttpImageFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| warn!("Failed to build HTTP client, remote images disabled: {}", e))
            .ok();
        Self { client }
    }

    fn fetch_remote(&self, url: &str) -> Option<Vec<u8>> {
        let client = self.client.as_ref()?;

        let response = match client.get(url).send() {
            Ok(response) => response,
            Err(e) => {
                warn!("Image request failed for {}: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Image request for {} returned {}", url, status);
            return None;
        }

        match response.bytes() {
            Ok(bytes) => {
                debug!("Fetched {} bytes from {}", bytes.len(), url);
                Some(bytes.to_vec())
            }
            Err(e) => {
                warn!("Failed to read image body from {}: {}", url, e);
                None
            }
        }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if url.starts_with("data:") {
            let decoded = decode_data_url(url);
            if decoded.is_none() {
                warn!("Malformed inline image data URL");
            }
            return decoded;
        }
        self.fetch_remote(url)
    }
}

/// Decode a base64 `data:` URL
fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let rest = url.strip_prefix("data:")?;
    let (meta, data) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    STANDARD.decode(data.trim()).ok()
}
