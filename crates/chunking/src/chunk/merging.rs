//! Greedy merging of adjacent fragments by term similarity.

use super::similarity::TermVectors;
use crate::config::MergeParams;
use crate::types::word_count;
use pagechunk_core::{AppError, AppResult};

/// Merges runs of similar adjacent fragments into chunk texts.
#[derive(Debug, Clone)]
pub struct SimilarityMerger {
    params: MergeParams,
}

/// Trimmed fragments accumulated since the last flush.
struct Run<'a> {
    fragments: Vec<&'a str>,
    words: usize,
}

impl<'a> Run<'a> {
    fn start(fragment: &'a str) -> Self {
        let fragment = fragment.trim();
        Self {
            fragments: vec![fragment],
            words: word_count(fragment),
        }
    }

    fn push(&mut self, fragment: &'a str, words: usize) {
        self.fragments.push(fragment.trim());
        self.words += words;
    }
}

impl SimilarityMerger {
    pub fn new(params: MergeParams) -> Self {
        Self { params }
    }

    /// Merge `fragments` left to right.
    ///
    /// Fragment `i` joins the pending run when its similarity to fragment
    /// `i - 1` reaches the threshold and the run's word count stays within
    /// `max_chunk_size`. Runs shorter than `min_chunk_size` trimmed
    /// characters are dropped.
    pub fn merge<S: AsRef<str>>(&self, fragments: &[S]) -> AppResult<Vec<String>> {
        let Some(first) = fragments.first() else {
            return Err(AppError::Segmentation(
                "no fragments to merge".to_string(),
            ));
        };

        let mut merged = Vec::new();

        if fragments.len() == 1 {
            self.flush(Run::start(first.as_ref()), &mut merged);
            return Ok(merged);
        }

        let similarities = TermVectors::fit(fragments)?.adjacent_similarities();

        let mut run = Run::start(first.as_ref());
        for (offset, fragment) in fragments[1..].iter().enumerate() {
            let fragment = fragment.as_ref();
            let words = word_count(fragment);
            let similarity = similarities[offset];

            if similarity >= self.params.threshold
                && run.words + words <= self.params.max_chunk_size
            {
                run.push(fragment, words);
            } else {
                self.flush(run, &mut merged);
                run = Run::start(fragment);
            }
        }
        self.flush(run, &mut merged);

        tracing::debug!(
            fragments = fragments.len(),
            merged = merged.len(),
            threshold = self.params.threshold,
            "Merged fragments by similarity"
        );

        Ok(merged)
    }

    fn flush(&self, run: Run<'_>, merged: &mut Vec<String>) {
        let text = run.fragments.join(" ");
        let trimmed = text.trim();
        if trimmed.chars().count() >= self.params.min_chunk_size && !trimmed.is_empty() {
            merged.push(trimmed.to_string());
        }
    }
}
