//! Search over the vector index built from the ingested page.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{require_query, Tool, ToolError, ToolKind};
use crate::index::VectorIndex;

/// Returns the text of the chunks nearest to the query.
pub struct RetrieverSearch {
    index: Arc<VectorIndex>,
    name: String,
    description: String,
    top_k: usize,
    max_chars: usize,
}

impl RetrieverSearch {
    pub fn new(
        index: Arc<VectorIndex>,
        name: &str,
        description: &str,
        top_k: usize,
        max_chars: usize,
    ) -> Self {
        Self {
            index,
            name: name.to_string(),
            description: description.to_string(),
            top_k,
            max_chars,
        }
    }
}

#[async_trait]
impl Tool for RetrieverSearch {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Retrieval
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let query = require_query(&args)?;
        let hits = self.index.query(query, self.top_k).await?;
        tracing::debug!("Retrieved {} chunks for '{}'", hits.len(), query);

        if hits.is_empty() {
            return Err(ToolError::EmptyResult(query.to_string()));
        }
        Ok(hits
            .iter()
            .map(|hit| hit.chunk.text.trim())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
