//! One chunk per page, with oversized-page slicing and short-page merging.

use super::ChunkStrategy;
use crate::chunk::ChunkIdCounter;
use crate::config::{ChunkingConfig, ChunkingMethod};
use crate::types::{word_count, ChunkRecord, PageRecord};
use pagechunk_core::AppResult;

pub struct ByPagesStrategy;

/// Handle on the most recently opened page chunk that short pages may still
/// be appended to.
#[derive(Debug, Clone, Copy)]
struct OpenChunk {
    index: usize,
    first_page: u32,
}

impl ChunkStrategy for ByPagesStrategy {
    fn method(&self) -> ChunkingMethod {
        ChunkingMethod::ByPages
    }

    fn process(
        &self,
        pages: &[PageRecord],
        config: &ChunkingConfig,
        ids: &mut ChunkIdCounter,
    ) -> AppResult<Vec<ChunkRecord>> {
        let mut chunks: Vec<ChunkRecord> = Vec::new();
        let mut open: Option<OpenChunk> = None;

        for page in pages {
            let text = page.text.trim();
            let words = word_count(text);

            if text.is_empty() && !config.merge_empty_pages {
                continue;
            }

            if config.merge_short_pages && words < config.min_page_words {
                if let Some(handle) = open {
                    let chunk = &mut chunks[handle.index];
                    chunk.content.push('\n');
                    chunk.content.push_str(text);
                    chunk.metadata.word_count += words;
                    chunk.metadata.page_range = format!("{}-{}", handle.first_page, page.page);

                    tracing::trace!(page = page.page, into = chunk.metadata.chunk_id, "Merged short page");
                    continue;
                }
            }

            if words > config.max_page_words {
                let tokens: Vec<&str> = text.split_whitespace().collect();
                for window in tokens.chunks(config.max_page_words) {
                    chunks.push(ChunkRecord::new(
                        ids.next_id(),
                        page.page,
                        format!("{}-{}", page.page, page.page),
                        window.join(" "),
                    ));
                }
                open = None;

                tracing::debug!(
                    page = page.page,
                    words,
                    max_page_words = config.max_page_words,
                    "Split oversized page"
                );
            } else {
                chunks.push(ChunkRecord::on_page(ids.next_id(), page.page, text.to_string()));
                open = Some(OpenChunk {
                    index: chunks.len() - 1,
                    first_page: page.page,
                });
            }
        }

        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingOptions;

    fn run(pages: &[PageRecord], options: ChunkingOptions) -> Vec<ChunkRecord> {
        let config = ChunkingConfig::resolve(ChunkingMethod::ByPages, &options).unwrap();
        let mut ids = ChunkIdCounter::new();
        ByPagesStrategy.process(pages, &config, &mut ids).unwrap()
    }

    #[test]
    fn test_one_chunk_per_page_skipping_blank() {
        let pages = vec![
            PageRecord::new(1, "  first page  "),
            PageRecord::new(2, "\n\t"),
            PageRecord::new(3, "third page"),
        ];
        let chunks = run(&pages, ChunkingOptions::default());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "first page");
        assert_eq!(chunks[0].metadata.page_range, "1");
        assert_eq!(chunks[1].metadata.chunk_id, 2);
        assert_eq!(chunks[1].metadata.page_number, 3);
    }

    #[test]
    fn test_oversized_page_split() {
        let pages = vec![PageRecord::new(1, "w1 w2 w3")];
        let chunks = run(
            &pages,
            ChunkingOptions {
                max_page_words: Some(2),
                ..Default::default()
            },
        );

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "w1 w2");
        assert_eq!(chunks[1].content, "w3");
        for chunk in &chunks {
            assert_eq!(chunk.metadata.page_range, "1-1");
        }
    }

    #[test]
    fn test_oversized_split_counts() {
        let text: Vec<String> = (0..23).map(|i| format!("w{}", i)).collect();
        let pages = vec![PageRecord::new(9, text.join(" "))];
        let chunks = run(
            &pages,
            ChunkingOptions {
                max_page_words: Some(5),
                ..Default::default()
            },
        );

        // ceil(23 / 5)
        assert_eq!(chunks.len(), 5);
        let counts: Vec<usize> = chunks.iter().map(|c| c.metadata.word_count).collect();
        assert_eq!(counts, vec![5, 5, 5, 5, 3]);
        assert!(chunks.iter().all(|c| c.metadata.page_range == "9-9"));
    }

    #[test]
    fn test_short_pages_merge_into_open_chunk() {
        let pages = vec![
            PageRecord::new(1, "one two three four"),
            PageRecord::new(2, "five"),
            PageRecord::new(3, "six seven"),
            PageRecord::new(4, "eight nine ten eleven"),
        ];
        let chunks = run(
            &pages,
            ChunkingOptions {
                merge_short_pages: Some(true),
                min_page_words: Some(3),
                ..Default::default()
            },
        );

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "one two three four\nfive\nsix seven");
        assert_eq!(chunks[0].metadata.word_count, 7);
        assert_eq!(chunks[0].metadata.page_range, "1-3");
        assert_eq!(chunks[0].metadata.page_number, 1);
        assert_eq!(chunks[1].metadata.chunk_id, 2);
        assert_eq!(chunks[1].metadata.page_range, "4");
    }

    #[test]
    fn test_first_short_page_starts_a_chunk() {
        let pages = vec![PageRecord::new(1, "tiny"), PageRecord::new(2, "also")];
        let chunks = run(
            &pages,
            ChunkingOptions {
                merge_short_pages: Some(true),
                min_page_words: Some(3),
                ..Default::default()
            },
        );

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "tiny\nalso");
        assert_eq!(chunks[0].metadata.page_range, "1-2");
    }

    #[test]
    fn test_no_merge_after_oversized_split() {
        let pages = vec![
            PageRecord::new(1, "a b c d"),
            PageRecord::new(2, "e b c d e f g h"),
            PageRecord::new(3, "short"),
        ];
        let chunks = run(
            &pages,
            ChunkingOptions {
                merge_short_pages: Some(true),
                min_page_words: Some(2),
                max_page_words: Some(5),
                ..Default::default()
            },
        );

        let summary: Vec<(u32, &str, &str)> = chunks
            .iter()
            .map(|c| (c.metadata.chunk_id, c.metadata.page_range.as_str(), c.content.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "1", "a b c d"),
                (2, "2-2", "e b c d e"),
                (3, "2-2", "f g h"),
                (4, "3", "short"),
            ]
        );
    }

    #[test]
    fn test_merge_empty_pages_emits_empty_chunk() {
        let pages = vec![PageRecord::new(1, "   "), PageRecord::new(2, "text")];
        let chunks = run(
            &pages,
            ChunkingOptions {
                merge_empty_pages: Some(true),
                ..Default::default()
            },
        );

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "");
        assert_eq!(chunks[0].metadata.word_count, 0);
        assert_eq!(chunks[0].metadata.chunk_id, 1);
        assert_eq!(chunks[1].metadata.chunk_id, 2);
    }
}
