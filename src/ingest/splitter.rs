//! Boundary-preserving text splitter with fixed character overlap.

use serde::Serialize;

use super::Document;
use crate::config::ConfigError;

/// Separators tried in order when choosing where a chunk ends.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "? ", "! ", " "];

/// A contiguous span of source text, the unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentChunk {
    /// Location of the document this chunk came from
    pub source: String,

    /// Position of the chunk within its document
    pub index: usize,

    /// Character offset of the chunk start within the document
    pub start: usize,

    /// Chunk text
    pub text: String,
}

impl DocumentChunk {
    /// Length of the chunk in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Splits documents into overlapping windows of at most `chunk_size` characters.
///
/// Each chunk ends at the last paragraph break inside its window, falling back
/// to line, sentence and word breaks, and finally to a hard cut. The next chunk
/// starts `chunk_overlap` characters before the previous end. A whitespace-only
/// window is never emitted; the next chunk then starts `chunk_overlap`
/// characters before the first non-whitespace character after it.
#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a splitter. Requires `0 <= chunk_overlap < chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidValue(
                "chunk_size".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(ConfigError::InvalidValue(
                "chunk_overlap".to_string(),
                format!(
                    "overlap {} must be smaller than chunk size {}",
                    chunk_overlap, chunk_size
                ),
            ));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split a document into chunks.
    pub fn split(&self, document: &Document) -> Vec<DocumentChunk> {
        let chars: Vec<char> = document.content.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < total {
            let end = if total - start <= self.chunk_size {
                total
            } else {
                self.find_end(&chars, start)
            };

            let text: String = chars[start..end].iter().collect();
            if text.trim().is_empty() {
                // Resume `chunk_overlap` characters before the text that follows the gap.
                match chars[end..].iter().position(|c| !c.is_whitespace()) {
                    Some(offset) => {
                        start = end + offset - self.chunk_overlap;
                        continue;
                    }
                    None => break,
                }
            }
            chunks.push(DocumentChunk {
                source: document.source.clone(),
                index: chunks.len(),
                start,
                text,
            });

            if end == total {
                break;
            }
            start = end - self.chunk_overlap;
        }

        chunks
    }

    /// Pick the end of the chunk starting at `start`.
    ///
    /// The end always lies in `(start + chunk_overlap, start + chunk_size]` so the
    /// following chunk starts strictly after this one.
    fn find_end(&self, chars: &[char], start: usize) -> usize {
        let min_end = start + self.chunk_overlap + 1;
        let max_end = start + self.chunk_size;

        for separator in SEPARATORS {
            let sep: Vec<char> = separator.chars().collect();
            let lowest = min_end.max(sep.len());
            let found = (lowest..=max_end)
                .rev()
                .find(|&end| chars[end - sep.len()..end] == sep[..]);
            if let Some(end) = found {
                return end;
            }
        }

        max_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        Document {
            source: "https://docs.example.com/".to_string(),
            content: content.to_string(),
        }
    }

    fn sample_text() -> String {
        let mut text = String::new();
        for p in 0..12 {
            for s in 0..6 {
                text.push_str(&format!(
                    "Paragraph {} sentence {} talks about tracing and evaluation. ",
                    p, s
                ));
            }
            text.push_str("\n\n");
        }
        text
    }

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        assert!(TextSplitter::new(100, 100).is_err());
        assert!(TextSplitter::new(0, 0).is_err());
        assert!(TextSplitter::new(100, 99).is_ok());
    }

    #[test]
    fn empty_document_has_no_chunks() {
        let splitter = TextSplitter::new(100, 20).unwrap();
        assert!(splitter.split(&doc("")).is_empty());
    }

    #[test]
    fn short_document_is_single_chunk() {
        let splitter = TextSplitter::new(1000, 200).unwrap();
        let chunks = splitter.split(&doc("LangSmith helps you trace LLM apps."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "LangSmith helps you trace LLM apps.");
        assert_eq!(chunks[0].start, 0);
    }

    #[test]
    fn adjacent_chunks_share_exactly_the_overlap() {
        for (size, overlap) in [(1000, 200), (300, 50), (120, 0), (80, 79)] {
            let splitter = TextSplitter::new(size, overlap).unwrap();
            let text = sample_text();
            let chunks = splitter.split(&doc(&text));
            assert!(chunks.len() > 1, "size {} should split", size);

            for chunk in &chunks {
                assert!(chunk.char_len() <= size);
            }
            for pair in chunks.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let a_chars: Vec<char> = a.text.chars().collect();
                let b_chars: Vec<char> = b.text.chars().collect();
                assert_eq!(b.start, a.start + a_chars.len() - overlap);
                assert_eq!(
                    a_chars[a_chars.len() - overlap..],
                    b_chars[..overlap],
                    "size {} overlap {}",
                    size,
                    overlap
                );
            }

            let last = chunks.last().unwrap();
            assert_eq!(last.start + last.char_len(), text.chars().count());
        }
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        let splitter = TextSplitter::new(60, 10).unwrap();
        let text = "First paragraph is here and short.\n\nSecond paragraph follows with more words in it.";
        let chunks = splitter.split(&doc(text));
        assert_eq!(chunks[0].text, "First paragraph is here and short.\n\n");
    }

    #[test]
    fn falls_back_to_word_boundary() {
        let splitter = TextSplitter::new(20, 5).unwrap();
        let chunks = splitter.split(&doc("alpha beta gamma delta epsilon zeta"));
        assert_eq!(chunks[0].text, "alpha beta gamma ");
    }

    #[test]
    fn hard_cut_without_boundaries() {
        let splitter = TextSplitter::new(10, 2).unwrap();
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = splitter.split(&doc(text));
        assert_eq!(chunks[0].text, "abcdefghij");
        assert_eq!(chunks[1].text, "ijklmnopqr");
        assert_eq!(chunks.last().unwrap().text.chars().last(), Some('z'));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let splitter = TextSplitter::new(5, 1).unwrap();
        let chunks = splitter.split(&doc("ééééééééé"));
        for chunk in &chunks {
            assert!(chunk.char_len() <= 5);
        }
        assert_eq!(chunks[0].text, "ééééé");
        assert_eq!(chunks[1].start, 4);
    }

    #[test]
    fn chunk_indices_are_sequential() {
        let splitter = TextSplitter::new(200, 40).unwrap();
        let chunks = splitter.split(&doc(&sample_text()));
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.source, "https://docs.example.com/");
        }
    }

    #[test]
    fn long_whitespace_gap_resumes_before_next_text() {
        let splitter = TextSplitter::new(10, 2).unwrap();
        let text = format!("abcdefgh{}ijklmnop", " ".repeat(30));
        let chunks = splitter.split(&doc(&text));

        let starts: Vec<usize> = chunks.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 36]);
        assert_eq!(chunks[0].text, "abcdefgh  ");
        assert_eq!(chunks[1].text, "  ijklmnop");
        assert_eq!(chunks[1].index, 1);
        for chunk in &chunks {
            assert!(!chunk.text.trim().is_empty());
            assert!(chunk.char_len() <= 10);
        }
    }

    #[test]
    fn trailing_whitespace_ends_the_split() {
        let splitter = TextSplitter::new(10, 2).unwrap();
        let text = format!("abcdefgh{}", "\n".repeat(25));
        let chunks = splitter.split(&doc(&text));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start, 0);
    }
}
