//! Chunking configuration.
//!
//! Callers describe a run with a sparse [`ChunkingOptions`]; it is resolved
//! against defaults into an immutable [`ChunkingConfig`] for one method. For
//! `hybrid` the `hybrid_*` values are copied onto the generic fields, so the
//! strategies only ever read one set of names.

use pagechunk_core::{AppConfig, AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Sentence separators in priority order.
pub const DEFAULT_SENTENCE_SEPARATORS: [&str; 8] = ["。", "！", "？", "\n", ".", "!", "?", " "];

const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_CHUNK_OVERLAP: usize = 200;
const DEFAULT_MIN_CHUNK_SIZE: usize = 1;
const DEFAULT_MAX_CHUNK_SIZE: usize = 5000;
const DEFAULT_SEMANTIC_THRESHOLD: f64 = 0.7;
const DEFAULT_PARAGRAPH_SEPARATOR: &str = "\n\n";
const DEFAULT_MAX_PAGE_WORDS: usize = 2000;
const DEFAULT_MIN_PAGE_WORDS: usize = 50;

/// The six chunking strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkingMethod {
    ByPages,
    FixedSize,
    ByParagraphs,
    BySentences,
    Semantic,
    Hybrid,
}

impl ChunkingMethod {
    pub const ALL: [ChunkingMethod; 6] = [
        ChunkingMethod::ByPages,
        ChunkingMethod::FixedSize,
        ChunkingMethod::ByParagraphs,
        ChunkingMethod::BySentences,
        ChunkingMethod::Semantic,
        ChunkingMethod::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkingMethod::ByPages => "by_pages",
            ChunkingMethod::FixedSize => "fixed_size",
            ChunkingMethod::ByParagraphs => "by_paragraphs",
            ChunkingMethod::BySentences => "by_sentences",
            ChunkingMethod::Semantic => "semantic",
            ChunkingMethod::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ChunkingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChunkingMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| {
                let supported: Vec<&str> = ChunkingMethod::ALL.iter().map(|m| m.as_str()).collect();
                AppError::Configuration(format!(
                    "Unsupported chunking method: '{}'. Supported: {}",
                    s,
                    supported.join(", ")
                ))
            })
    }
}

/// Raw, partially specified chunking parameters.
///
/// Every field is optional; unset fields fall back to the defaults when the
/// options are resolved into a [`ChunkingConfig`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChunkingOptions {
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub min_chunk_size: Option<usize>,
    pub max_chunk_size: Option<usize>,
    pub semantic_threshold: Option<f64>,
    pub paragraph_separator: Option<String>,
    pub sentence_separators: Option<Vec<String>>,
    pub keep_separator: Option<bool>,

    pub merge_empty_pages: Option<bool>,
    pub merge_short_pages: Option<bool>,
    pub max_page_words: Option<usize>,
    pub min_page_words: Option<usize>,

    pub semantic_chunk_size: Option<usize>,
    pub semantic_chunk_overlap: Option<usize>,
    pub semantic_sentence_separators: Option<Vec<String>>,
    pub semantic_keep_separator: Option<bool>,
    pub semantic_min_chunk_size: Option<usize>,
    pub semantic_max_chunk_size: Option<usize>,

    pub hybrid_max_chunk_size: Option<usize>,
    pub hybrid_min_chunk_size: Option<usize>,
    pub hybrid_paragraph_separator: Option<String>,
    pub hybrid_sentence_separators: Option<Vec<String>>,
    pub hybrid_chunk_size: Option<usize>,
    pub hybrid_chunk_overlap: Option<usize>,
    pub hybrid_keep_separator: Option<bool>,
    pub hybrid_semantic_threshold: Option<f64>,
}

macro_rules! layer_fields {
    ($base:expr, $over:expr, $($field:ident),+ $(,)?) => {
        ChunkingOptions {
            $($field: $over.$field.or($base.$field),)+
        }
    };
}

impl ChunkingOptions {
    /// Decode the `chunking:` section of an application config.
    ///
    /// A config without that section yields empty options.
    pub fn from_app_config(config: &AppConfig) -> AppResult<Self> {
        match &config.chunking {
            Some(section) => serde_yaml::from_value(section.clone()).map_err(|e| {
                AppError::Configuration(format!("Invalid chunking section: {}", e))
            }),
            None => Ok(Self::default()),
        }
    }

    /// Overlay `overrides` on top of `self`; set fields in `overrides` win.
    pub fn layer(self, overrides: ChunkingOptions) -> ChunkingOptions {
        layer_fields!(
            self,
            overrides,
            chunk_size,
            chunk_overlap,
            min_chunk_size,
            max_chunk_size,
            semantic_threshold,
            paragraph_separator,
            sentence_separators,
            keep_separator,
            merge_empty_pages,
            merge_short_pages,
            max_page_words,
            min_page_words,
            semantic_chunk_size,
            semantic_chunk_overlap,
            semantic_sentence_separators,
            semantic_keep_separator,
            semantic_min_chunk_size,
            semantic_max_chunk_size,
            hybrid_max_chunk_size,
            hybrid_min_chunk_size,
            hybrid_paragraph_separator,
            hybrid_sentence_separators,
            hybrid_chunk_size,
            hybrid_chunk_overlap,
            hybrid_keep_separator,
            hybrid_semantic_threshold,
        )
    }
}

/// Load chunking options from a standalone YAML file.
pub fn load_options(path: &Path) -> AppResult<ChunkingOptions> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Configuration(format!("Failed to read chunking options at {:?}: {}", path, e))
    })?;

    let options: ChunkingOptions = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Configuration(format!("Failed to parse chunking options at {:?}: {}", path, e))
    })?;

    tracing::debug!("Loaded chunking options from {:?}", path);
    Ok(options)
}

/// Save chunking options as YAML, creating parent directories as needed.
pub fn save_options(path: &Path, options: &ChunkingOptions) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let yaml = serde_yaml::to_string(options)?;
    fs::write(path, yaml)?;

    tracing::debug!("Saved chunking options to {:?}", path);
    Ok(())
}

/// Parameters of one [`TextSegmenter`](crate::chunk::TextSegmenter) run.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentParams {
    /// Window size in characters
    pub chunk_size: usize,
    /// Characters shared by consecutive windows
    pub chunk_overlap: usize,
    /// Separators, highest priority first
    pub separators: Vec<String>,
    pub keep_separator: bool,
}

/// Parameters of one [`SimilarityMerger`](crate::chunk::SimilarityMerger) run.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeParams {
    /// Minimum adjacent cosine similarity to merge
    pub threshold: f64,
    /// Minimum trimmed character length of an emitted run
    pub min_chunk_size: usize,
    /// Maximum accumulated word count of a run
    pub max_chunk_size: usize,
}

/// Fully resolved, immutable configuration for one chunking call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkingConfig {
    pub method: ChunkingMethod,

    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub semantic_threshold: f64,
    pub paragraph_separator: String,
    pub sentence_separators: Vec<String>,
    pub keep_separator: bool,

    pub merge_empty_pages: bool,
    pub merge_short_pages: bool,
    pub max_page_words: usize,
    pub min_page_words: usize,

    pub semantic_chunk_size: usize,
    pub semantic_chunk_overlap: usize,
    pub semantic_sentence_separators: Vec<String>,
    pub semantic_keep_separator: bool,
    pub semantic_min_chunk_size: usize,
    pub semantic_max_chunk_size: usize,

    pub hybrid_max_chunk_size: usize,
    pub hybrid_min_chunk_size: usize,
    pub hybrid_paragraph_separator: String,
    pub hybrid_sentence_separators: Vec<String>,
    pub hybrid_chunk_size: usize,
    pub hybrid_chunk_overlap: usize,
    pub hybrid_keep_separator: bool,
    pub hybrid_semantic_threshold: f64,
}

fn default_separators() -> Vec<String> {
    DEFAULT_SENTENCE_SEPARATORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// An empty list counts as unset.
fn separators_or_default(separators: &Option<Vec<String>>) -> Vec<String> {
    match separators {
        Some(list) if !list.is_empty() => list.clone(),
        _ => default_separators(),
    }
}

impl ChunkingConfig {
    /// Defaults for `method` with no overrides.
    pub fn new(method: ChunkingMethod) -> AppResult<Self> {
        Self::resolve(method, &ChunkingOptions::default())
    }

    /// Resolve `options` against the defaults for `method` and validate.
    pub fn resolve(method: ChunkingMethod, options: &ChunkingOptions) -> AppResult<Self> {
        let mut config = Self {
            method,
            chunk_size: options.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            chunk_overlap: options.chunk_overlap.unwrap_or(DEFAULT_CHUNK_OVERLAP),
            min_chunk_size: options.min_chunk_size.unwrap_or(DEFAULT_MIN_CHUNK_SIZE),
            max_chunk_size: options.max_chunk_size.unwrap_or(DEFAULT_MAX_CHUNK_SIZE),
            semantic_threshold: options
                .semantic_threshold
                .unwrap_or(DEFAULT_SEMANTIC_THRESHOLD),
            paragraph_separator: options
                .paragraph_separator
                .clone()
                .unwrap_or_else(|| DEFAULT_PARAGRAPH_SEPARATOR.to_string()),
            sentence_separators: separators_or_default(&options.sentence_separators),
            keep_separator: options.keep_separator.unwrap_or(false),

            merge_empty_pages: options.merge_empty_pages.unwrap_or(false),
            merge_short_pages: options.merge_short_pages.unwrap_or(false),
            max_page_words: options.max_page_words.unwrap_or(DEFAULT_MAX_PAGE_WORDS),
            min_page_words: options.min_page_words.unwrap_or(DEFAULT_MIN_PAGE_WORDS),

            semantic_chunk_size: options.semantic_chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            semantic_chunk_overlap: options
                .semantic_chunk_overlap
                .unwrap_or(DEFAULT_CHUNK_OVERLAP),
            semantic_sentence_separators: separators_or_default(
                &options.semantic_sentence_separators,
            ),
            semantic_keep_separator: options.semantic_keep_separator.unwrap_or(false),
            semantic_min_chunk_size: options
                .semantic_min_chunk_size
                .unwrap_or(DEFAULT_MIN_CHUNK_SIZE),
            semantic_max_chunk_size: options
                .semantic_max_chunk_size
                .unwrap_or(DEFAULT_MAX_CHUNK_SIZE),

            hybrid_max_chunk_size: options
                .hybrid_max_chunk_size
                .unwrap_or(DEFAULT_MAX_CHUNK_SIZE),
            hybrid_min_chunk_size: options
                .hybrid_min_chunk_size
                .unwrap_or(DEFAULT_MIN_CHUNK_SIZE),
            hybrid_paragraph_separator: options
                .hybrid_paragraph_separator
                .clone()
                .unwrap_or_else(|| DEFAULT_PARAGRAPH_SEPARATOR.to_string()),
            hybrid_sentence_separators: separators_or_default(&options.hybrid_sentence_separators),
            hybrid_chunk_size: options.hybrid_chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
            hybrid_chunk_overlap: options.hybrid_chunk_overlap.unwrap_or(DEFAULT_CHUNK_OVERLAP),
            hybrid_keep_separator: options.hybrid_keep_separator.unwrap_or(false),
            hybrid_semantic_threshold: options
                .hybrid_semantic_threshold
                .unwrap_or(DEFAULT_SEMANTIC_THRESHOLD),
        };

        if method == ChunkingMethod::Hybrid {
            config.alias_hybrid();
        }

        config.validate()?;
        Ok(config)
    }

    /// Copy the `hybrid_*` family onto the generic fields.
    fn alias_hybrid(&mut self) {
        self.max_chunk_size = self.hybrid_max_chunk_size;
        self.min_chunk_size = self.hybrid_min_chunk_size;
        self.semantic_threshold = self.hybrid_semantic_threshold;
        self.paragraph_separator = self.hybrid_paragraph_separator.clone();
        self.sentence_separators = self.hybrid_sentence_separators.clone();
        self.chunk_size = self.hybrid_chunk_size;
        self.chunk_overlap = self.hybrid_chunk_overlap;
        self.keep_separator = self.hybrid_keep_separator;
    }

    /// Check the parameters the selected method actually reads.
    pub fn validate(&self) -> AppResult<()> {
        match self.method {
            ChunkingMethod::ByPages => {
                if self.max_page_words == 0 {
                    return Err(AppError::Validation(
                        "max_page_words must be greater than 0".to_string(),
                    ));
                }
            }
            ChunkingMethod::FixedSize | ChunkingMethod::BySentences => {
                check_window("chunk_size", self.chunk_size, "chunk_overlap", self.chunk_overlap)?;
            }
            ChunkingMethod::ByParagraphs => {
                if self.paragraph_separator.is_empty() {
                    return Err(AppError::Validation(
                        "paragraph_separator must not be empty".to_string(),
                    ));
                }
            }
            ChunkingMethod::Semantic => {
                check_window(
                    "semantic_chunk_size",
                    self.semantic_chunk_size,
                    "semantic_chunk_overlap",
                    self.semantic_chunk_overlap,
                )?;
                check_bounds(
                    "semantic_min_chunk_size",
                    self.semantic_min_chunk_size,
                    "semantic_max_chunk_size",
                    self.semantic_max_chunk_size,
                )?;
                check_threshold("semantic_threshold", self.semantic_threshold)?;
            }
            ChunkingMethod::Hybrid => {
                check_window(
                    "hybrid_chunk_size",
                    self.chunk_size,
                    "hybrid_chunk_overlap",
                    self.chunk_overlap,
                )?;
                check_bounds(
                    "hybrid_min_chunk_size",
                    self.min_chunk_size,
                    "hybrid_max_chunk_size",
                    self.max_chunk_size,
                )?;
                check_threshold("hybrid_semantic_threshold", self.semantic_threshold)?;
                if self.paragraph_separator.is_empty() {
                    return Err(AppError::Validation(
                        "hybrid_paragraph_separator must not be empty".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Segmenter parameters for fixed_size, by_sentences and hybrid.
    ///
    /// fixed_size always keeps separators at the start of the piece they
    /// introduce; the others follow `keep_separator`.
    pub fn segment_params(&self) -> SegmentParams {
        SegmentParams {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators: self.sentence_separators.clone(),
            keep_separator: self.method == ChunkingMethod::FixedSize || self.keep_separator,
        }
    }

    /// Segmenter parameters for the semantic pre-split.
    pub fn semantic_segment_params(&self) -> SegmentParams {
        SegmentParams {
            chunk_size: self.semantic_chunk_size,
            chunk_overlap: self.semantic_chunk_overlap,
            separators: self.semantic_sentence_separators.clone(),
            keep_separator: self.semantic_keep_separator,
        }
    }

    /// Merger parameters read from the generic fields (hybrid).
    pub fn merge_params(&self) -> MergeParams {
        MergeParams {
            threshold: self.semantic_threshold,
            min_chunk_size: self.min_chunk_size,
            max_chunk_size: self.max_chunk_size,
        }
    }

    /// Merger parameters for the semantic strategy.
    pub fn semantic_merge_params(&self) -> MergeParams {
        MergeParams {
            threshold: self.semantic_threshold,
            min_chunk_size: self.semantic_min_chunk_size,
            max_chunk_size: self.semantic_max_chunk_size,
        }
    }

    /// The parameters relevant to `method`, as echoed in the envelope.
    pub fn echo(&self) -> serde_json::Value {
        match self.method {
            ChunkingMethod::ByPages => json!({
                "min_chunk_size": self.min_chunk_size,
            }),
            ChunkingMethod::FixedSize => json!({
                "chunk_size": self.chunk_size,
                "chunk_overlap": self.chunk_overlap,
                "min_chunk_size": self.min_chunk_size,
            }),
            ChunkingMethod::ByParagraphs => json!({
                "min_chunk_size": self.min_chunk_size,
                "paragraph_separator": self.paragraph_separator,
            }),
            ChunkingMethod::BySentences => json!({
                "chunk_size": self.chunk_size,
                "chunk_overlap": self.chunk_overlap,
                "min_chunk_size": self.min_chunk_size,
                "sentence_separators": self.sentence_separators,
                "keep_separator": self.keep_separator,
            }),
            ChunkingMethod::Semantic => json!({
                "semantic_threshold": self.semantic_threshold,
                "semantic_chunk_size": self.semantic_chunk_size,
                "semantic_chunk_overlap": self.semantic_chunk_overlap,
                "semantic_sentence_separators": self.semantic_sentence_separators,
                "semantic_keep_separator": self.semantic_keep_separator,
                "semantic_min_chunk_size": self.semantic_min_chunk_size,
                "semantic_max_chunk_size": self.semantic_max_chunk_size,
            }),
            ChunkingMethod::Hybrid => json!({
                "hybrid_max_chunk_size": self.hybrid_max_chunk_size,
                "hybrid_min_chunk_size": self.hybrid_min_chunk_size,
                "hybrid_paragraph_separator": self.hybrid_paragraph_separator,
                "hybrid_sentence_separators": self.hybrid_sentence_separators,
                "hybrid_chunk_size": self.hybrid_chunk_size,
                "hybrid_chunk_overlap": self.hybrid_chunk_overlap,
                "hybrid_keep_separator": self.hybrid_keep_separator,
                "hybrid_semantic_threshold": self.hybrid_semantic_threshold,
            }),
        }
    }
}

fn check_window(size_name: &str, size: usize, overlap_name: &str, overlap: usize) -> AppResult<()> {
    if size == 0 {
        return Err(AppError::Validation(format!(
            "{} must be greater than 0",
            size_name
        )));
    }
    if overlap >= size {
        return Err(AppError::Validation(format!(
            "{} ({}) must be smaller than {} ({})",
            overlap_name, overlap, size_name, size
        )));
    }
    Ok(())
}

fn check_bounds(min_name: &str, min: usize, max_name: &str, max: usize) -> AppResult<()> {
    if min > max {
        return Err(AppError::Validation(format!(
            "{} ({}) must not exceed {} ({})",
            min_name, min, max_name, max
        )));
    }
    Ok(())
}

fn check_threshold(name: &str, threshold: f64) -> AppResult<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AppError::Validation(format!(
            "{} must be within [0, 1], got {}",
            name, threshold
        )));
    }
    Ok(())
}
