use std::path::Path;

use image::DynamicImage;
use thiserror::Error;

use crate::consolidate::{consolidate, ConsolidateError};
use crate::engine::OcrEngine;
use crate::normalize::{group_into_lines, EngineResult, DEFAULT_LINE_THRESHOLD};
use crate::preprocess;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("At least one OCR engine must be configured")]
    NoEngines,
    #[error(transparent)]
    Consolidate(#[from] ConsolidateError),
}

/// Runs one document through preprocess → engines → consolidation.
///
/// Engines run sequentially within a document (some backends hold
/// internal mutable state, so concurrent calls on one document are
/// not safe). Process documents concurrently by running independent
/// pipelines in parallel worker threads. No timeout is imposed here;
/// callers should bound a hung engine externally.
pub struct DocumentPipeline {
    engines: Vec<Box<dyn OcrEngine>>,
    line_threshold: f32,
}

impl DocumentPipeline {
    /// Zero engines is a configuration error, not a runtime condition.
    pub fn new(engines: Vec<Box<dyn OcrEngine>>) -> Result<Self, PipelineError> {
        if engines.is_empty() {
            return Err(PipelineError::NoEngines);
        }
        Ok(Self { engines, line_threshold: DEFAULT_LINE_THRESHOLD })
    }

    /// Vertical distance within which detections are judged to share
    /// a text row.
    pub fn with_line_threshold(mut self, line_threshold: f32) -> Self {
        self.line_threshold = line_threshold;
        self
    }

    pub fn process_file(&self, path: &Path) -> Result<String, PipelineError> {
        tracing::info!("processing document: {}", path.display());
        let image = image::open(path)?;
        self.process_image(&image)
    }

    pub fn process_image(&self, image: &DynamicImage) -> Result<String, PipelineError> {
        let prepared = preprocess::preprocess(image);

        let results: Vec<EngineResult> = self
            .engines
            .iter()
            .map(|engine| self.run_engine(engine.as_ref(), &prepared))
            .collect();

        let text = consolidate(&results)?;
        tracing::info!(chars = text.len(), "consolidated text ready");
        Ok(text)
    }

    /// A failing engine degrades to an empty result so the rest of the
    /// ensemble still gets a vote.
    fn run_engine(&self, engine: &dyn OcrEngine, image: &DynamicImage) -> EngineResult {
        match engine.recognize(image) {
            Ok(detections) => {
                let lines = group_into_lines(detections, self.line_threshold);
                let result = EngineResult::new(engine.name(), lines);
                tracing::info!(
                    engine = engine.name(),
                    chars = result.text().len(),
                    "engine finished"
                );
                result
            }
            Err(e) => {
                tracing::warn!(engine = engine.name(), "engine failed: {e}");
                EngineResult::empty(engine.name())
            }
        }
    }
}
