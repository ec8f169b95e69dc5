//! Numbering, accounting and size invariants that every strategy must hold.

use crate::{chunk_text, ChunkingMethod, ChunkingOptions, DocumentEnvelope, DocumentMetadata, PageRecord};
use pagechunk_core::AppError;

#[cfg(test)]
mod tests {
    use super::*;

    /// A small multi-page document mixing short, long, blank and CJK pages.
    fn sample_pages() -> Vec<PageRecord> {
        vec![
            PageRecord::new(
                1,
                "Rust programs are fast. Rust programs are safe.\n\n\
                 The borrow checker enforces ownership rules at compile time.",
            ),
            PageRecord::new(2, "   \n  "),
            PageRecord::new(
                3,
                "Gardening needs patience! Tomatoes like sun. Tomatoes like water.\n\n\
                 Short.\n\nA third paragraph with several more words to count here.",
            ),
            PageRecord::new(4, "第一句话。第二句话！第三句话？最后一句"),
            PageRecord::new(
                7,
                "word ".repeat(60).trim_end().to_string(),
            ),
        ]
    }

    /// Options small enough that every strategy actually splits.
    fn small_options() -> ChunkingOptions {
        ChunkingOptions {
            chunk_size: Some(40),
            chunk_overlap: Some(8),
            min_chunk_size: Some(4),
            max_page_words: Some(25),
            semantic_chunk_size: Some(40),
            semantic_chunk_overlap: Some(0),
            semantic_min_chunk_size: Some(4),
            semantic_max_chunk_size: Some(30),
            semantic_threshold: Some(0.3),
            hybrid_max_chunk_size: Some(50),
            hybrid_min_chunk_size: Some(4),
            hybrid_chunk_size: Some(30),
            hybrid_chunk_overlap: Some(0),
            hybrid_semantic_threshold: Some(0.3),
            ..Default::default()
        }
    }

    fn run(method: ChunkingMethod) -> DocumentEnvelope {
        chunk_text(
            &sample_pages(),
            method.as_str(),
            &DocumentMetadata::new("sample.pdf", "pdfplumber"),
            &small_options(),
        )
        .unwrap()
    }

    #[test]
    fn test_ids_are_one_to_n_for_every_method() {
        for method in ChunkingMethod::ALL {
            let envelope = run(method);
            let ids: Vec<u32> = envelope.chunks.iter().map(|c| c.metadata.chunk_id).collect();
            let expected: Vec<u32> = (1..=envelope.total_chunks as u32).collect();

            assert!(!ids.is_empty(), "{} produced no chunks", method);
            assert_eq!(ids, expected, "{} ids are not 1..=N", method);
        }
    }

    #[test]
    fn test_counts_match_for_every_method() {
        for method in ChunkingMethod::ALL {
            let envelope = run(method);
            assert_eq!(envelope.total_chunks, envelope.chunks.len());
            assert_eq!(envelope.total_pages, sample_pages().len());
            assert_eq!(envelope.chunking_method, method);
            assert_eq!(envelope.filename, "sample.pdf");
            assert_eq!(envelope.loading_method, "pdfplumber");
        }
    }

    #[test]
    fn test_chunks_are_trimmed_non_empty_and_page_attributed() {
        let page_numbers: Vec<u32> = sample_pages().iter().map(|p| p.page).collect();

        for method in ChunkingMethod::ALL {
            for chunk in run(method).chunks {
                assert!(!chunk.content.is_empty(), "{} emitted an empty chunk", method);
                assert_eq!(chunk.content, chunk.content.trim());
                assert!(page_numbers.contains(&chunk.metadata.page_number));
                assert_eq!(
                    chunk.metadata.word_count,
                    chunk.content.split_whitespace().count()
                );
                // Blank page 2 never yields content
                assert_ne!(chunk.metadata.page_number, 2);
            }
        }
    }

    #[test]
    fn test_min_chunk_size_holds() {
        for method in [
            ChunkingMethod::FixedSize,
            ChunkingMethod::BySentences,
            ChunkingMethod::ByParagraphs,
            ChunkingMethod::Semantic,
            ChunkingMethod::Hybrid,
        ] {
            for chunk in run(method).chunks {
                assert!(
                    chunk.content.chars().count() >= 4,
                    "{} emitted {:?}",
                    method,
                    chunk.content
                );
            }
        }
    }

    #[test]
    fn test_semantic_word_budget_holds() {
        for chunk in run(ChunkingMethod::Semantic).chunks {
            assert!(chunk.metadata.word_count <= 30);
        }
    }

    #[test]
    fn test_by_pages_oversized_page() {
        let envelope = run(ChunkingMethod::ByPages);
        let page_seven: Vec<_> = envelope
            .chunks
            .iter()
            .filter(|c| c.metadata.page_number == 7)
            .collect();

        // 60 words, 25 per window
        assert_eq!(page_seven.len(), 3);
        let counts: Vec<usize> = page_seven.iter().map(|c| c.metadata.word_count).collect();
        assert_eq!(counts, vec![25, 25, 10]);
        assert!(page_seven.iter().all(|c| c.metadata.page_range == "7-7"));
    }

    #[test]
    fn test_idempotent_apart_from_timestamp() {
        for method in ChunkingMethod::ALL {
            let first = run(method);
            let second = run(method);
            assert_eq!(first.chunks, second.chunks, "{} is not deterministic", method);
            assert_eq!(first.chunking_config, second.chunking_config);
        }
    }

    #[test]
    fn test_concurrent_calls_do_not_share_numbering() {
        let handles: Vec<_> = ChunkingMethod::ALL
            .into_iter()
            .map(|method| std::thread::spawn(move || (method, run(method))))
            .collect();

        for handle in handles {
            let (method, envelope) = handle.join().unwrap();
            assert_eq!(envelope.chunks, run(method).chunks);
            assert_eq!(envelope.chunks[0].metadata.chunk_id, 1);
        }
    }

    #[test]
    fn test_by_paragraphs_example() {
        let envelope = chunk_text(
            &[PageRecord::new(1, "Para A.\n\nPara B.")],
            "by_paragraphs",
            &DocumentMetadata::default(),
            &ChunkingOptions {
                paragraph_separator: Some("\n\n".to_string()),
                min_chunk_size: Some(1),
                ..Default::default()
            },
        )
        .unwrap();

        let summary: Vec<(u32, &str, u32, &str)> = envelope
            .chunks
            .iter()
            .map(|c| {
                (
                    c.metadata.chunk_id,
                    c.content.as_str(),
                    c.metadata.page_number,
                    c.metadata.page_range.as_str(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![(1, "Para A.", 1, "1"), (2, "Para B.", 1, "1")]
        );
    }

    #[test]
    fn test_envelope_serializes_to_json() {
        let envelope = run(ChunkingMethod::Hybrid);
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["chunking_method"], "hybrid");
        assert_eq!(value["chunking_config"]["hybrid_max_chunk_size"], 50);
        assert!(value["timestamp"].is_string());
        assert_eq!(value["chunks"][0]["metadata"]["chunk_id"], 1);
        assert_eq!(value["total_chunks"], envelope.chunks.len());
    }

    #[test]
    fn test_empty_page_map_is_a_configuration_error() {
        let err = chunk_text(
            &[],
            "by_pages",
            &DocumentMetadata::default(),
            &ChunkingOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_unknown_method_is_a_configuration_error() {
        let err = chunk_text(
            &sample_pages(),
            "by_chapters",
            &DocumentMetadata::default(),
            &ChunkingOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_invalid_overlap_is_a_validation_error() {
        let err = chunk_text(
            &sample_pages(),
            "fixed_size",
            &DocumentMetadata::default(),
            &ChunkingOptions {
                chunk_size: Some(10),
                chunk_overlap: Some(20),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_mid_document_failure_returns_no_chunks() {
        let pages = vec![
            PageRecord::new(1, "Perfectly ordinary words."),
            PageRecord::new(2, "....\n!!!!"),
        ];
        let result = chunk_text(
            &pages,
            "semantic",
            &DocumentMetadata::default(),
            &ChunkingOptions {
                semantic_chunk_size: Some(4),
                semantic_chunk_overlap: Some(0),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(AppError::Segmentation(_))));
    }
}
