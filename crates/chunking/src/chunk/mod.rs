//! Page-aware chunking engine.
//!
//! This module provides:
//! - A recursive separator-driven segmenter with character overlap
//! - Term-similarity merging of adjacent fragments
//! - The six chunking strategies and the pipeline that dispatches to them
//! - The per-call chunk id counter shared by every strategy

mod merging;
mod pipeline;
mod segmenter;
mod similarity;
pub mod strategies;

pub use merging::SimilarityMerger;
pub use pipeline::ChunkPipeline;
pub(crate) use pipeline::validate_pages;
pub use segmenter::TextSegmenter;
pub use similarity::TermVectors;

/// Hands out chunk ids for one chunking call.
///
/// Starts at 1 and advances by exactly one per emitted chunk. A counter
/// belongs to a single call and is never shared between calls.
#[derive(Debug)]
pub struct ChunkIdCounter {
    next: u32,
}

impl ChunkIdCounter {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next id.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for ChunkIdCounter {
    fn default() -> Self {
        Self::new()
    }
}
