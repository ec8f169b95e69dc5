//! One chunk per paragraph.

use super::{push_on_page, split_paragraphs, ChunkStrategy};
use crate::chunk::ChunkIdCounter;
use crate::config::{ChunkingConfig, ChunkingMethod};
use crate::types::{ChunkRecord, PageRecord};
use pagechunk_core::AppResult;

pub struct ByParagraphsStrategy;

impl ChunkStrategy for ByParagraphsStrategy {
    fn method(&self) -> ChunkingMethod {
        ChunkingMethod::ByParagraphs
    }

    fn process(
        &self,
        pages: &[PageRecord],
        config: &ChunkingConfig,
        ids: &mut ChunkIdCounter,
    ) -> AppResult<Vec<ChunkRecord>> {
        let mut chunks = Vec::new();

        for page in pages.iter().filter(|page| !page.is_blank()) {
            for paragraph in split_paragraphs(&page.text, &config.paragraph_separator) {
                if paragraph.chars().count() < config.min_chunk_size {
                    continue;
                }
                push_on_page(&mut chunks, ids, page.page, paragraph);
            }
        }

        Ok(chunks)
    }
}
