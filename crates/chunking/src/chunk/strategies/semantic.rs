//! Sentence fragments merged by similarity, page by page.

use super::{push_on_page, ChunkStrategy};
use crate::chunk::{ChunkIdCounter, SimilarityMerger, TextSegmenter};
use crate::config::{ChunkingConfig, ChunkingMethod};
use crate::types::{ChunkRecord, PageRecord};
use pagechunk_core::AppResult;

pub struct SemanticStrategy;

impl ChunkStrategy for SemanticStrategy {
    fn method(&self) -> ChunkingMethod {
        ChunkingMethod::Semantic
    }

    fn process(
        &self,
        pages: &[PageRecord],
        config: &ChunkingConfig,
        ids: &mut ChunkIdCounter,
    ) -> AppResult<Vec<ChunkRecord>> {
        let segmenter = TextSegmenter::new(config.semantic_segment_params())?;
        let merger = SimilarityMerger::new(config.semantic_merge_params());
        let mut chunks = Vec::new();

        for page in pages.iter().filter(|page| !page.is_blank()) {
            let fragments = segmenter.split(&page.text);
            if fragments.is_empty() {
                continue;
            }

            let merged = merger.merge(&fragments).inspect_err(|e| {
                tracing::error!(page = page.page, fragments = fragments.len(), "Semantic merge failed: {}", e);
            })?;

            for text in &merged {
                push_on_page(&mut chunks, ids, page.page, text);
            }
        }

        Ok(chunks)
    }
}
