//! Sentence-granular windows per page.

use super::fixed::segment_pages;
use super::ChunkStrategy;
use crate::chunk::{ChunkIdCounter, TextSegmenter};
use crate::config::{ChunkingConfig, ChunkingMethod};
use crate::types::{ChunkRecord, PageRecord};
use pagechunk_core::AppResult;

/// Same mechanism as fixed-size windows, but honours `keep_separator`.
pub struct BySentencesStrategy;

impl ChunkStrategy for BySentencesStrategy {
    fn method(&self) -> ChunkingMethod {
        ChunkingMethod::BySentences
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingOptions;

    #[test]
    fn test_keeps_separators_when_asked() {
        let options = ChunkingOptions {
            chunk_size: Some(12),
            chunk_overlap: Some(0),
            sentence_separators: Some(vec!["!".to_string()]),
            keep_separator: Some(true),
            ..Default::default()
        };
        let config = ChunkingConfig::resolve(ChunkingMethod::BySentences, &options).unwrap();
        let pages = vec![PageRecord::new(2, "Stop here!Go there!")];

        let mut ids = ChunkIdCounter::new();
        let chunks = BySentencesStrategy.process(&pages, &config, &mut ids).unwrap();
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["Stop here", "!Go there!"]);
    }
}
