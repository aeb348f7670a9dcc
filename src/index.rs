//! In-memory vector index over document chunks.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use crate::embeddings::{Embedder, EmbeddingError};
use crate::ingest::DocumentChunk;

/// A query hit.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    /// Squared L2 distance to the query vector
    pub distance: f32,
}

/// Flat L2 index. Built once at startup, read-only afterwards.
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    entries: Vec<(Vec<f32>, DocumentChunk)>,
    dimension: usize,
}

impl VectorIndex {
    /// Embed every chunk and store the vectors in insertion order.
    pub async fn build(
        chunks: Vec<DocumentChunk>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, EmbeddingError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed(&texts).await?
        };
        if vectors.len() != chunks.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: chunks.len(),
                got: vectors.len(),
            });
        }

        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        for vector in &vectors {
            if vector.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    got: vector.len(),
                });
            }
        }

        tracing::info!(
            "Built vector index with {} chunks (dimension {})",
            chunks.len(),
            dimension
        );

        Ok(Self {
            embedder,
            entries: vectors.into_iter().zip(chunks).collect(),
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return up to `k` chunks nearest to `text`, nearest first.
    ///
    /// Equal distances keep insertion order.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredChunk>, EmbeddingError> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                got: 0,
            })?;
        if query_vector.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                got: query_vector.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (vector, _))| (i, squared_l2(vector, &query_vector)))
            .collect();
        // sort_by is stable, so ties stay in insertion order
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| ScoredChunk {
                chunk: self.entries[i].1.clone(),
                distance,
            })
            .collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
