//! Document ingestion: fetch one page and turn it into plain text.

mod html;
mod splitter;

pub use html::html_to_text;
pub use splitter::{DocumentChunk, TextSplitter};

use serde::Serialize;
use thiserror::Error;

/// Errors raised while fetching the source document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error fetching {url}: {status}")]
    Http { url: String, status: u16 },

    #[error("Unsupported content type '{content_type}' at {url}")]
    UnsupportedContentType { url: String, content_type: String },

    #[error("No readable text found at {0}")]
    EmptyDocument(String),
}

/// Text content of a fetched page.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Location the text was fetched from
    pub source: String,

    /// Extracted plain text
    pub content: String,
}

/// Fetch `url` and extract its readable text.
pub async fn fetch_document(client: &reqwest::Client, url: &str) -> Result<Document, FetchError> {
    tracing::info!("Fetching source document {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html")
        .to_lowercase();

    let body = response.text().await.map_err(|source| FetchError::Network {
        url: url.to_string(),
        source,
    })?;

    let content = if content_type.contains("text/html") || content_type.contains("application/xhtml")
    {
        html_to_text(&body)
    } else if content_type.starts_with("text/plain") || content_type.starts_with("text/markdown") {
        body
    } else {
        return Err(FetchError::UnsupportedContentType {
            url: url.to_string(),
            content_type,
        });
    };

    if content.trim().is_empty() {
        return Err(FetchError::EmptyDocument(url.to_string()));
    }

    tracing::debug!("Extracted {} characters from {}", content.chars().count(), url);

    Ok(Document {
        source: url.to_string(),
        content,
    })
}
