//! Chunking data model: pages in, chunk records and the document envelope out.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ChunkingMethod;

/// One page of extracted text, as supplied by the loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// 1-based page number
    pub page: u32,

    /// Extracted page text
    pub text: String,
}

impl PageRecord {
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }

    /// True when the page holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Caller-supplied document metadata.
///
/// Only `filename` and `loading_method` are read; other keys are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub filename: String,

    #[serde(default)]
    pub loading_method: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DocumentMetadata {
    pub fn new(filename: impl Into<String>, loading_method: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            loading_method: loading_method.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A chunk of page text with its numbering and page attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Chunk text
    pub content: String,

    pub metadata: ChunkMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// 1-based, strictly increasing within one document
    pub chunk_id: u32,

    /// Page the chunk starts on
    pub page_number: u32,

    /// `"a"` or `"a-b"`
    pub page_range: String,

    /// Whitespace-separated token count of `content`
    pub word_count: usize,
}

impl ChunkRecord {
    /// Create a chunk with an explicit page range.
    pub fn new(chunk_id: u32, page_number: u32, page_range: String, content: String) -> Self {
        let word_count = word_count(&content);
        Self {
            content,
            metadata: ChunkMetadata {
                chunk_id,
                page_number,
                page_range,
                word_count,
            },
        }
    }

    /// Create a chunk confined to a single page (`page_range = "p"`).
    pub fn on_page(chunk_id: u32, page_number: u32, content: String) -> Self {
        Self::new(chunk_id, page_number, page_number.to_string(), content)
    }
}

/// Final output of one chunking call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEnvelope {
    pub filename: String,
    pub total_chunks: usize,
    pub total_pages: usize,
    pub loading_method: String,
    pub chunking_method: ChunkingMethod,

    /// Parameters relevant to `chunking_method`
    pub chunking_config: serde_json::Value,

    pub timestamp: DateTime<Utc>,
    pub chunks: Vec<ChunkRecord>,
}

/// Count whitespace-separated tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
