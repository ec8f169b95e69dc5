//! Recursive separator-driven text segmenter.
//!
//! Text is cut on the highest-priority separator it contains. Pieces that
//! are still longer than the window size are cut again with the separators
//! that follow; a piece with no separator left is kept whole. The pieces are
//! then packed greedily into windows, each window after the first seeded with
//! the last `chunk_overlap` characters of its predecessor.
//!
//! All lengths are counted in `char`s so multi-byte scripts are measured the
//! same way as ASCII.

use crate::config::SegmentParams;
use pagechunk_core::{AppError, AppResult};

/// A piece of the input together with the separator text that precedes it
/// in the source (empty when the separator is kept inside the piece).
#[derive(Debug, Clone, Copy)]
struct Piece<'a> {
    joiner: &'a str,
    text: &'a str,
}

/// Splits text into overlapping, size-bounded windows.
#[derive(Debug, Clone)]
pub struct TextSegmenter {
    params: SegmentParams,
}

impl TextSegmenter {
    /// Create a segmenter; fails when the overlap does not fit in a window.
    pub fn new(params: SegmentParams) -> AppResult<Self> {
        if params.chunk_size == 0 {
            return Err(AppError::Validation(
                "segmenter chunk_size must be greater than 0".to_string(),
            ));
        }
        if params.chunk_overlap >= params.chunk_size {
            return Err(AppError::Validation(format!(
                "segmenter chunk_overlap ({}) must be smaller than chunk_size ({})",
                params.chunk_overlap, params.chunk_size
            )));
        }
        Ok(Self { params })
    }

    /// Split `text` into windows. Whitespace-only windows are dropped;
    /// windows are otherwise returned untrimmed so the overlap is exact.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        self.collect_pieces(text, &self.params.separators, "", &mut pieces);
        let windows = self.pack(&pieces);

        tracing::trace!(
            pieces = pieces.len(),
            windows = windows.len(),
            chunk_size = self.params.chunk_size,
            "Segmented {} chars",
            char_len(text)
        );

        windows
    }

    fn collect_pieces<'a>(
        &'a self,
        text: &'a str,
        separators: &'a [String],
        leading: &'a str,
        out: &mut Vec<Piece<'a>>,
    ) {
        let found = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()));

        let Some((index, separator)) = found else {
            out.push(Piece {
                joiner: leading,
                text,
            });
            return;
        };

        let remaining = &separators[index + 1..];
        let keep = self.params.keep_separator;
        let joiner = if keep { "" } else { separator.as_str() };

        // The first non-empty part inherits the joiner that preceded `text`
        let mut leading = Some(leading);
        for part in split_on(text, separator, keep) {
            if part.is_empty() {
                continue;
            }
            let part_joiner = leading.take().unwrap_or(joiner);

            if char_len(part) > self.params.chunk_size && !remaining.is_empty() {
                self.collect_pieces(part, remaining, part_joiner, out);
            } else {
                out.push(Piece {
                    joiner: part_joiner,
                    text: part,
                });
            }
        }
    }

    fn pack(&self, pieces: &[Piece<'_>]) -> Vec<String> {
        let chunk_size = self.params.chunk_size;
        let mut windows = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;
        // Whether `current` holds a piece beyond the overlap seed
        let mut has_piece = false;

        for piece in pieces {
            let piece_len = char_len(piece.text);
            let joiner_len = if current.is_empty() {
                0
            } else {
                char_len(piece.joiner)
            };

            if has_piece && current_len + joiner_len + piece_len > chunk_size {
                current = self.flush(&mut windows, current);
                current_len = char_len(&current);
            }

            if !current.is_empty() {
                current.push_str(piece.joiner);
                current_len += char_len(piece.joiner);
            }
            current.push_str(piece.text);
            current_len += piece_len;
            has_piece = true;
        }

        if has_piece {
            self.flush(&mut windows, current);
        }

        windows
    }

    /// Emit `window` and return the overlap seed for the next one.
    fn flush(&self, windows: &mut Vec<String>, window: String) -> String {
        let seed = tail_chars(&window, self.params.chunk_overlap).to_string();
        if !window.trim().is_empty() {
            windows.push(window);
        }
        seed
    }
}

/// Split on `separator`; with `keep` the separator starts each later part.
/// The empty separator splits into single characters.
fn split_on<'a>(text: &'a str, separator: &str, keep: bool) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    if !keep {
        return text.split(separator).collect();
    }

    let mut parts = Vec::new();
    let mut start = 0;
    for (index, _) in text.match_indices(separator) {
        parts.push(&text[start..index]);
        start = index;
    }
    parts.push(&text[start..]);
    parts
}

/// The last `n` characters of `text`.
fn tail_chars(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((index, _)) => &text[index..],
        None => text,
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
