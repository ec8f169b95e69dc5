//! Chunking pipeline orchestrator.

use super::{
    strategies::{
        ByPagesStrategy, ByParagraphsStrategy, BySentencesStrategy, ChunkStrategy,
        FixedSizeStrategy, HybridStrategy, SemanticStrategy,
    },
    ChunkIdCounter,
};
use crate::config::{ChunkingConfig, ChunkingMethod, ChunkingOptions};
use crate::types::{DocumentEnvelope, DocumentMetadata, PageRecord};
use chrono::Utc;
use pagechunk_core::{AppError, AppResult};

/// Runs one resolved configuration over page maps.
///
/// The pipeline holds no per-call state: every call to [`process`] gets its
/// own chunk id counter, so one pipeline may serve concurrent callers.
///
/// [`process`]: ChunkPipeline::process
#[derive(Debug, Clone)]
pub struct ChunkPipeline {
    config: ChunkingConfig,
}

impl ChunkPipeline {
    /// Create a new pipeline with configuration.
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// Resolve `options` for `method` and build a pipeline.
    pub fn from_options(method: ChunkingMethod, options: &ChunkingOptions) -> AppResult<Self> {
        Ok(Self::new(ChunkingConfig::resolve(method, options)?))
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk `pages` and wrap the result in a document envelope.
    ///
    /// A failure anywhere aborts the whole call; no partial chunk list is
    /// ever returned.
    pub fn process(
        &self,
        pages: &[PageRecord],
        metadata: &DocumentMetadata,
    ) -> AppResult<DocumentEnvelope> {
        let method = self.config.method;

        validate_pages(pages).inspect_err(|e| {
            tracing::error!(
                filename = %metadata.filename,
                method = %method,
                "Rejected page map: {}",
                e
            );
        })?;

        // 1. Select the strategy
        let strategy = self.dispatch_strategy();

        // 2. Chunk with a counter owned by this call
        let mut ids = ChunkIdCounter::new();
        let chunks = strategy
            .process(pages, &self.config, &mut ids)
            .inspect_err(|e| {
                tracing::error!(
                    filename = %metadata.filename,
                    method = %method,
                    pages = pages.len(),
                    "Chunking failed: {}",
                    e
                );
            })?;

        debug_assert_eq!(ids.issued() as usize, chunks.len());

        tracing::info!(
            filename = %metadata.filename,
            method = %method,
            "Chunking complete: {} chunks created from {} pages",
            chunks.len(),
            pages.len()
        );

        // 3. Assemble the envelope
        Ok(DocumentEnvelope {
            filename: metadata.filename.clone(),
            total_chunks: chunks.len(),
            total_pages: pages.len(),
            loading_method: metadata.loading_method.clone(),
            chunking_method: method,
            chunking_config: self.config.echo(),
            timestamp: Utc::now(),
            chunks,
        })
    }

    /// Select the strategy for the configured method.
    fn dispatch_strategy(&self) -> Box<dyn ChunkStrategy> {
        match self.config.method {
            ChunkingMethod::ByPages => Box::new(ByPagesStrategy),
            ChunkingMethod::FixedSize => Box::new(FixedSizeStrategy),
            ChunkingMethod::ByParagraphs => Box::new(ByParagraphsStrategy),
            ChunkingMethod::BySentences => Box::new(BySentencesStrategy),
            ChunkingMethod::Semantic => Box::new(SemanticStrategy),
            ChunkingMethod::Hybrid => Box::new(HybridStrategy),
        }
    }
}

/// A page map must be non-empty and use 1-based page numbers.
pub(crate) fn validate_pages(pages: &[PageRecord]) -> AppResult<()> {
    if pages.is_empty() {
        return Err(AppError::Configuration(
            "Page map is required for chunking".to_string(),
        ));
    }

    if let Some(page) = pages.iter().find(|page| page.page == 0) {
        return Err(AppError::Validation(format!(
            "Page numbers start at 1, got {} (text: {:?})",
            page.page,
            page.text.chars().take(30).collect::<String>()
        )));
    }

    Ok(())
}
