use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    Body(String, #[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No data found in CSV file")]
    Empty,

    #[error("Unbalanced quoting in CSV data (quote opened on line {line} is never closed)")]
    UnbalancedQuotes { line: usize },

    #[error("Error parsing CSV: {0}")]
    Csv(#[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
