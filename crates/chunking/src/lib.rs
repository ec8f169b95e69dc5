//! Page-aware document chunking.
//!
//! Turns a page map (text already extracted by a loader) into numbered,
//! page-attributed chunks ready for indexing, using one of six strategies:
//! `by_pages`, `fixed_size`, `by_paragraphs`, `by_sentences`, `semantic` and
//! `hybrid`.
//!
//! # Example
//! ```
//! use pagechunk_chunking::{chunk_text, ChunkingOptions, DocumentMetadata, PageRecord};
//!
//! let pages = vec![PageRecord::new(1, "Para A.\n\nPara B.")];
//! let metadata = DocumentMetadata::new("notes.txt", "text");
//!
//! let envelope = chunk_text(&pages, "by_paragraphs", &metadata, &ChunkingOptions::default())
//!     .expect("chunking failed");
//! assert_eq!(envelope.total_chunks, 2);
//! assert_eq!(envelope.chunks[1].content, "Para B.");
//! ```

pub mod chunk;
pub mod config;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunk::{ChunkIdCounter, ChunkPipeline, SimilarityMerger, TextSegmenter};
pub use config::{
    load_options, save_options, ChunkingConfig, ChunkingMethod, ChunkingOptions, MergeParams,
    SegmentParams,
};
pub use types::{ChunkMetadata, ChunkRecord, DocumentEnvelope, DocumentMetadata, PageRecord};

use pagechunk_core::AppResult;

/// Chunk a page map with the named method.
///
/// Checks the page map first, then the method name, then resolves
/// `options` against the method's defaults. Every failure is logged with the
/// document name and method before it is returned.
pub fn chunk_text(
    page_map: &[PageRecord],
    method: &str,
    metadata: &DocumentMetadata,
    options: &ChunkingOptions,
) -> AppResult<DocumentEnvelope> {
    let resolved = chunk::validate_pages(page_map)
        .and_then(|_| method.parse::<ChunkingMethod>())
        .and_then(|method| ChunkPipeline::from_options(method, options));

    let pipeline = resolved.inspect_err(|e| {
        tracing::error!(
            filename = %metadata.filename,
            method,
            pages = page_map.len(),
            "Error in chunk_text: {}",
            e
        );
    })?;

    pipeline.process(page_map, metadata)
}
