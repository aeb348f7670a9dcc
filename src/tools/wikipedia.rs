//! Wikipedia lookup via the MediaWiki API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{require_query, Tool, ToolError, ToolKind};

/// Searches Wikipedia and returns page intro summaries.
pub struct WikipediaSearch {
    client: reqwest::Client,
    api_url: String,
    top_k_results: usize,
    max_chars: usize,
}

impl WikipediaSearch {
    pub fn new(client: reqwest::Client, api_url: &str, top_k_results: usize, max_chars: usize) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            top_k_results,
            max_chars,
        }
    }

    async fn search_titles(&self, query: &str) -> Result<Vec<String>, ToolError> {
        let limit = self.top_k_results.to_string();
        let response: SearchResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    async fn page_summary(&self, title: &str) -> Result<Option<String>, ToolError> {
        let response: ExtractResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("formatversion", "2"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let page = response.query.and_then(|q| q.pages.into_iter().next());
        Ok(page.and_then(|p| {
            let extract = p.extract.unwrap_or_default();
            let extract = extract.trim();
            if extract.is_empty() {
                None
            } else {
                Some(format!("Page: {}\nSummary: {}", p.title, extract))
            }
        }))
    }
}

#[async_trait]
impl Tool for WikipediaSearch {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "A wrapper around Wikipedia. Useful for when you need to answer general questions about people, places, companies, facts, historical events, or other subjects. Input should be a search query."
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Encyclopedia
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let query = require_query(&args)?;
        tracing::debug!("Wikipedia search: {}", query);

        let titles = self.search_titles(query).await?;
        let mut summaries = Vec::new();
        for title in titles.iter().take(self.top_k_results) {
            if let Some(summary) = self.page_summary(title).await? {
                summaries.push(summary);
            }
        }

        if summaries.is_empty() {
            return Err(ToolError::EmptyResult(query.to_string()));
        }
        Ok(summaries.join("\n\n"))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    title: String,
    #[serde(default)]
    extract: Option<String>,
}
