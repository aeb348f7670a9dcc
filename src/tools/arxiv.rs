//! arXiv lookup via the Atom query API.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use super::{require_query, Tool, ToolError, ToolKind};

/// arXiv rejects very long search strings.
const MAX_QUERY_CHARS: usize = 300;

/// Searches arXiv and returns abstracts of the top papers.
pub struct ArxivSearch {
    client: reqwest::Client,
    api_url: String,
    top_k_results: usize,
    max_chars: usize,
}

/// One paper from the Atom feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ArxivEntry {
    pub published: String,
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
}

impl ArxivEntry {
    fn render(&self) -> String {
        format!(
            "Published: {}\nTitle: {}\nAuthors: {}\nSummary: {}",
            self.published,
            self.title,
            self.authors.join(", "),
            self.summary
        )
    }
}

impl ArxivSearch {
    pub fn new(client: reqwest::Client, api_url: &str, top_k_results: usize, max_chars: usize) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            top_k_results,
            max_chars,
        }
    }
}

#[async_trait]
impl Tool for ArxivSearch {
    fn name(&self) -> &str {
        "arxiv"
    }

    fn description(&self) -> &str {
        "A wrapper around Arxiv.org. Useful for when you need to answer questions about Physics, Mathematics, Computer Science, Quantitative Biology, Quantitative Finance, Statistics, Electrical Engineering, and Economics from scientific articles on arxiv.org. Input should be a search query."
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Preprint
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let query = require_query(&args)?;
        let query: String = query.chars().take(MAX_QUERY_CHARS).collect();
        tracing::debug!("arXiv search: {}", query);

        let search_query = format!("all:{}", query);
        let max_results = self.top_k_results.to_string();
        let body = self
            .client
            .get(&self.api_url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let entries = parse_feed(&body);
        if entries.is_empty() {
            return Err(ToolError::EmptyResult(query));
        }
        Ok(entries
            .iter()
            .take(self.top_k_results)
            .map(ArxivEntry::render)
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}

struct FeedPatterns {
    entry: Regex,
    title: Regex,
    summary: Regex,
    published: Regex,
    author: Regex,
}

fn patterns() -> &'static FeedPatterns {
    static PATTERNS: OnceLock<FeedPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FeedPatterns {
        entry: Regex::new(r"(?s)<entry>(.*?)</entry>").expect("static pattern"),
        title: Regex::new(r"(?s)<title[^>]*>(.*?)</title>").expect("static pattern"),
        summary: Regex::new(r"(?s)<summary[^>]*>(.*?)</summary>").expect("static pattern"),
        published: Regex::new(r"(?s)<published>(.*?)</published>").expect("static pattern"),
        author: Regex::new(r"(?s)<author>\s*<name>(.*?)</name>").expect("static pattern"),
    })
}

/// Extract entries from an arXiv Atom feed. Error entries are skipped.
pub fn parse_feed(xml: &str) -> Vec<ArxivEntry> {
    let p = patterns();
    p.entry
        .captures_iter(xml)
        .filter_map(|entry| {
            let body = entry.get(1)?.as_str();
            let capture = |re: &Regex| {
                re.captures(body)
                    .and_then(|c| c.get(1))
                    .map(|m| clean_text(m.as_str()))
            };
            let title = capture(&p.title)?;
            if title == "Error" {
                return None;
            }
            let published = capture(&p.published)
                .map(|d| d.chars().take(10).collect())
                .unwrap_or_default();
            let summary = capture(&p.summary).unwrap_or_default();
            let authors = p
                .author
                .captures_iter(body)
                .filter_map(|c| c.get(1).map(|m| clean_text(m.as_str())))
                .collect();
            Some(ArxivEntry {
                published,
                title,
                authors,
                summary,
            })
        })
        .collect()
}

/// Collapse whitespace and decode the XML entities arXiv emits.
fn clean_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_server;
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::header;
    use axum::routing::get;
    use axum::Router;
    use serde_json::json;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title type="html">ArXiv Query: search_query=all:attention</title>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You
      Need</title>
    <summary>  The dominant sequence transduction models are based on complex
      recurrent &amp; convolutional neural networks.</summary>
    <author>
      <name>Ashish Vaswani</name>
    </author>
    <author>
      <name>Noam Shazeer</name>
    </author>
  </entry>
</feed>"#;

    #[test]
    fn parses_atom_entries() {
        let entries = parse_feed(FEED);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title, "Attention Is All You Need");
        assert_eq!(entry.published, "2017-06-12");
        assert_eq!(entry.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert!(entry.summary.contains("recurrent & convolutional"));
    }

    #[test]
    fn skips_error_entries() {
        let feed = "<feed><entry><title>Error</title><summary>incorrect id format</summary></entry></feed>";
        assert!(parse_feed(feed).is_empty());
    }

    #[tokio::test]
    async fn renders_published_title_authors_summary() {
        let router = Router::new().route(
            "/api/query",
            get(|| async { ([(header::CONTENT_TYPE, "application/atom+xml")], FEED) }),
        );
        let base = spawn_server(router).await;
        let tool = ArxivSearch::new(reqwest::Client::new(), &format!("{}/api/query", base), 1, 200);
        let output = tool
            .execute(json!({"query": "attention"}))
            .await
            .expect("execute");
        assert!(output.starts_with(
            "Published: 2017-06-12\nTitle: Attention Is All You Need\nAuthors: Ashish Vaswani, Noam Shazeer\nSummary:"
        ));
    }

    #[tokio::test]
    async fn empty_feed_is_empty_result() {
        let router = Router::new().route("/api/query", get(|| async { "<feed></feed>" }));
        let base = spawn_server(router).await;
        let tool = ArxivSearch::new(reqwest::Client::new(), &format!("{}/api/query", base), 1, 200);
        let err = tool.execute(json!({"query": "nothing"})).await.unwrap_err();
        assert!(matches!(err, ToolError::EmptyResult(_)));
    }

    #[tokio::test]
    async fn keeps_existing_query_parameters_on_the_api_url() {
        let router = Router::new().route(
            "/api/query",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let matches = params.get("search_query").map(String::as_str)
                    == Some("all:attention is all")
                    && params.get("max_results").map(String::as_str) == Some("1")
                    && params.get("sortBy").map(String::as_str) == Some("relevance");
                if matches {
                    FEED
                } else {
                    "<feed></feed>"
                }
            }),
        );
        let base = spawn_server(router).await;
        let tool = ArxivSearch::new(
            reqwest::Client::new(),
            &format!("{}/api/query?sortBy=relevance", base),
            1,
            200,
        );
        let output = tool
            .execute(json!({"query": "attention is all"}))
            .await
            .expect("execute");
        assert!(output.contains("Attention Is All You Need"));
    }
}
