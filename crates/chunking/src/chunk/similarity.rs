//! TF-IDF term vectors and cosine similarity over a small fragment set.
//!
//! Terms are lower-cased Unicode words. Inverse document frequency is
//! smoothed, `ln((1 + n) / (1 + df)) + 1`, so a term present in every
//! fragment still carries weight. Vectors are sparse, L2-normalized and keyed
//! by term index in first-seen order, which keeps every float sum in a fixed
//! order and the scores reproducible run to run.

use std::collections::{BTreeMap, HashMap};

use pagechunk_core::{AppError, AppResult};
use unicode_segmentation::UnicodeSegmentation;

type SparseVector = BTreeMap<usize, f64>;

/// Scores this close to 1 are rounding noise on parallel vectors.
const UNIT_TOLERANCE: f64 = 1e-12;

/// TF-IDF vectors for an ordered set of fragments.
#[derive(Debug, Clone)]
pub struct TermVectors {
    vectors: Vec<SparseVector>,
    vocabulary_size: usize,
}

impl TermVectors {
    /// Fit term weights over `fragments`.
    ///
    /// Fails when the set is empty or contains no word at all.
    pub fn fit<S: AsRef<str>>(fragments: &[S]) -> AppResult<Self> {
        if fragments.is_empty() {
            return Err(AppError::Segmentation(
                "cannot weight terms of an empty fragment set".to_string(),
            ));
        }

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<BTreeMap<usize, usize>> = Vec::with_capacity(fragments.len());

        for fragment in fragments {
            let mut tf = BTreeMap::new();
            for token in tokenize(fragment.as_ref()) {
                let next = vocabulary.len();
                let index = *vocabulary.entry(token).or_insert(next);
                *tf.entry(index).or_insert(0) += 1;
            }
            counts.push(tf);
        }

        if vocabulary.is_empty() {
            return Err(AppError::Segmentation(format!(
                "empty vocabulary: none of the {} fragments contains a word",
                fragments.len()
            )));
        }

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tf in &counts {
            for &index in tf.keys() {
                document_frequency[index] += 1;
            }
        }

        let n = fragments.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let vectors = counts
            .into_iter()
            .map(|tf| {
                normalize(
                    tf.into_iter()
                        .map(|(index, count)| (index, count as f64 * idf[index]))
                        .collect(),
                )
            })
            .collect();

        Ok(Self {
            vectors,
            vocabulary_size: vocabulary.len(),
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Cosine similarity of fragments `a` and `b`, within `[0, 1]`.
    ///
    /// A fragment without words is dissimilar to everything.
    pub fn cosine(&self, a: usize, b: usize) -> f64 {
        cosine(&self.vectors[a], &self.vectors[b])
    }

    /// `similarity(i - 1, i)` for every `i >= 1`.
    pub fn adjacent_similarities(&self) -> Vec<f64> {
        (1..self.vectors.len())
            .map(|i| self.cosine(i - 1, i))
            .collect()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words().map(|word| word.to_lowercase())
}

/// Scale `v` to unit length; a vector without terms stays empty.
fn normalize(mut v: SparseVector) -> SparseVector {
    let norm = v.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in v.values_mut() {
            *weight /= norm;
        }
    }
    v
}

/// Dot product of two unit vectors, clamped to `[0, 1]`.
fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(index, weight)| large.get(index).map(|other| weight * other))
        .sum();

    if 1.0 - dot < UNIT_TOLERANCE {
        return 1.0;
    }
    dot.clamp(0.0, 1.0)
}
