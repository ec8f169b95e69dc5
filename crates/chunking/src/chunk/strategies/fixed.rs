//! Fixed-size windows per page.

use super::{push_on_page, ChunkStrategy};
use crate::chunk::{ChunkIdCounter, TextSegmenter};
use crate::config::{ChunkingConfig, ChunkingMethod};
use crate::types::{ChunkRecord, PageRecord};
use pagechunk_core::AppResult;

pub struct FixedSizeStrategy;

impl ChunkStrategy for FixedSizeStrategy {
    fn method(&self) -> ChunkingMethod {
        ChunkingMethod::FixedSize
    }

    fn process(
        &self,
        pages: &[PageRecord],
        config: &ChunkingConfig,
        ids: &mut ChunkIdCounter,
    ) -> AppResult<Vec<ChunkRecord>> {
        let segmenter = TextSegmenter::new(config.segment_params())?;
        Ok(segment_pages(pages, &segmenter, config.min_chunk_size, ids))
    }
}

/// Run `segmenter` on each page independently, dropping windows whose
/// trimmed length is below `min_chunk_size`.
pub(super) fn segment_pages(
    pages: &[PageRecord],
    segmenter: &TextSegmenter,
    min_chunk_size: usize,
    ids: &mut ChunkIdCounter,
) -> Vec<ChunkRecord> {
    let mut chunks = Vec::new();

    for page in pages.iter().filter(|page| !page.is_blank()) {
        let before = chunks.len();
        for window in segmenter.split(&page.text) {
            if window.trim().chars().count() < min_chunk_size {
                continue;
            }
            push_on_page(&mut chunks, ids, page.page, &window);
        }

        tracing::debug!(
            page = page.page,
            chunks = chunks.len() - before,
            "Segmented page"
        );
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::strategies::BySentencesStrategy;
    use crate::config::ChunkingOptions;

    fn config(chunk_size: usize, chunk_overlap: usize, min_chunk_size: usize) -> ChunkingConfig {
        ChunkingConfig::resolve(
            ChunkingMethod::FixedSize,
            &ChunkingOptions {
                chunk_size: Some(chunk_size),
                chunk_overlap: Some(chunk_overlap),
                min_chunk_size: Some(min_chunk_size),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_ids_continue_across_pages() {
        let pages = vec![
            PageRecord::new(1, "aaa bbb ccc ddd"),
            PageRecord::new(2, "   "),
            PageRecord::new(3, "eee fff ggg hhh"),
        ];
        let mut ids = ChunkIdCounter::new();
        let chunks = FixedSizeStrategy
            .process(&pages, &config(8, 0, 1), &mut ids)
            .unwrap();

        let summary: Vec<(u32, u32, &str)> = chunks
            .iter()
            .map(|c| (c.metadata.chunk_id, c.metadata.page_number, c.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, 1, "aaa bbb"),
                (2, 1, "ccc ddd"),
                (3, 3, "eee fff"),
                (4, 3, "ggg hhh"),
            ]
        );
        assert_eq!(ids.issued(), 4);
    }

    #[test]
    fn test_short_windows_dropped_without_gaps() {
        let pages = vec![PageRecord::new(1, "longword x\nanotherword")];
        let mut ids = ChunkIdCounter::new();
        let chunks = FixedSizeStrategy
            .process(&pages, &config(10, 0, 3), &mut ids)
            .unwrap();

        assert!(chunks.iter().all(|c| c.content.chars().count() >= 3));
        let chunk_ids: Vec<u32> = chunks.iter().map(|c| c.metadata.chunk_id).collect();
        assert_eq!(chunk_ids, (1..=chunks.len() as u32).collect::<Vec<_>>());
    }

    #[test]
    fn test_separators_start_the_next_window() {
        let options = ChunkingOptions {
            chunk_size: Some(12),
            chunk_overlap: Some(0),
            sentence_separators: Some(vec![".".to_string()]),
            keep_separator: Some(false),
            ..Default::default()
        };
        let pages = vec![PageRecord::new(1, "First one.Second one.Third")];

        let fixed = ChunkingConfig::resolve(ChunkingMethod::FixedSize, &options).unwrap();
        let mut ids = ChunkIdCounter::new();
        let chunks = FixedSizeStrategy.process(&pages, &fixed, &mut ids).unwrap();
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["First one", ".Second one", ".Third"]);

        // by_sentences honours the caller's flag and strips them
        let sentences = ChunkingConfig::resolve(ChunkingMethod::BySentences, &options).unwrap();
        let mut ids = ChunkIdCounter::new();
        let chunks = BySentencesStrategy
            .process(&pages, &sentences, &mut ids)
            .unwrap();
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["First one", "Second one", "Third"]);
    }

    #[test]
    fn test_overlap_content_is_trimmed() {
        let pages = vec![PageRecord::new(5, "alpha beta gamma delta")];
        let mut ids = ChunkIdCounter::new();
        let chunks = FixedSizeStrategy
            .process(&pages, &config(11, 5, 1), &mut ids)
            .unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert_eq!(chunk.content, chunk.content.trim());
            assert_eq!(chunk.metadata.page_range, "5");
        }
    }
}
