//! Paragraphs first; oversized paragraphs fall back to similarity merging.

use super::{push_on_page, split_paragraphs, ChunkStrategy};
use crate::chunk::{ChunkIdCounter, SimilarityMerger, TextSegmenter};
use crate::config::{ChunkingConfig, ChunkingMethod};
use crate::types::{ChunkRecord, PageRecord};
use pagechunk_core::AppResult;

/// Reads the generic config fields, which carry the `hybrid_*` values.
pub struct HybridStrategy;

impl ChunkStrategy for HybridStrategy {
    fn method(&self) -> ChunkingMethod {
        ChunkingMethod::Hybrid
    }

    fn process(
        &self,
        pages: &[PageRecord],
        config: &ChunkingConfig,
        ids: &mut ChunkIdCounter,
    ) -> AppResult<Vec<ChunkRecord>> {
        let segmenter = TextSegmenter::new(config.segment_params())?;
        let merger = SimilarityMerger::new(config.merge_params());
        let mut chunks = Vec::new();

        for page in pages.iter().filter(|page| !page.is_blank()) {
            for paragraph in split_paragraphs(&page.text, &config.paragraph_separator) {
                let length = paragraph.chars().count();

                if length <= config.max_chunk_size {
                    if length >= config.min_chunk_size {
                        push_on_page(&mut chunks, ids, page.page, paragraph);
                    }
                    continue;
                }

                let fragments = segmenter.split(paragraph);
                if fragments.is_empty() {
                    continue;
                }

                tracing::debug!(
                    page = page.page,
                    length,
                    fragments = fragments.len(),
                    "Oversized paragraph, merging sentence fragments"
                );

                let merged = merger.merge(&fragments).inspect_err(|e| {
                    tracing::error!(page = page.page, length, "Hybrid merge failed: {}", e);
                })?;

                for text in &merged {
                    push_on_page(&mut chunks, ids, page.page, text);
                }
            }
        }

        Ok(chunks)
    }
}
