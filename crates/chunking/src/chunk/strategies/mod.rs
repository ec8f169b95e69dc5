//! Chunking strategy implementations.

mod fixed;
mod hybrid;
mod pages;
mod paragraphs;
mod semantic;
mod sentences;

pub use fixed::FixedSizeStrategy;
pub use hybrid::HybridStrategy;
pub use pages::ByPagesStrategy;
pub use paragraphs::ByParagraphsStrategy;
pub use semantic::SemanticStrategy;
pub use sentences::BySentencesStrategy;

use super::ChunkIdCounter;
use crate::config::{ChunkingConfig, ChunkingMethod};
use crate::types::{ChunkRecord, PageRecord};
use pagechunk_core::AppResult;

/// Trait for chunking strategies.
///
/// A strategy walks the pages in order and numbers every chunk it emits
/// from the shared counter.
pub trait ChunkStrategy: Send + Sync {
    /// The method this strategy implements.
    fn method(&self) -> ChunkingMethod;

    /// Turn pages into ordered chunks.
    fn process(
        &self,
        pages: &[PageRecord],
        config: &ChunkingConfig,
        ids: &mut ChunkIdCounter,
    ) -> AppResult<Vec<ChunkRecord>>;
}

/// Append a trimmed single-page chunk and take its id.
fn push_on_page(chunks: &mut Vec<ChunkRecord>, ids: &mut ChunkIdCounter, page: u32, content: &str) {
    chunks.push(ChunkRecord::on_page(
        ids.next_id(),
        page,
        content.trim().to_string(),
    ));
}

/// Trimmed, non-empty pieces of `text` split on the literal `separator`.
fn split_paragraphs<'a>(text: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> {
    text.split(separator)
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
}
