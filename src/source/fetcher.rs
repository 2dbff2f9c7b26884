use crate::source::error::FetchError;
use log::{info, warn};
use reqwest::Client;

/// Retrieves raw CSV text over HTTP(S).
///
/// One GET per call, no retries and no timeout beyond the client's defaults.
#[derive(Debug, Clone, Default)]
pub struct CsvFetcher {
    client: Client,
}

impl CsvFetcher {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Downloads `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// * [`FetchError::NetworkRequest`] when the request cannot be sent.
    /// * [`FetchError::HttpStatus`] when the server answers with a non-success status.
    /// * [`FetchError::Body`] when the body cannot be read or decoded.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        info!("Downloading CSV from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => FetchError::NetworkRequest(url.to_string(), e),
                });
            }
        };

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Body(url.to_string(), e))?;
        info!("Downloaded {} bytes of CSV from {}", text.len(), url);
        Ok(text)
    }
}
