use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Image encode error: {0}")]
    Encode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
}

/// One recognized text fragment with its position, emitted by one engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub text: String,
    /// Polygon outline of the fragment, four or more points.
    pub points: Vec<(f32, f32)>,
    /// Engine-reported confidence in 0.0–1.0, when the engine has one.
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn new(text: impl Into<String>, points: Vec<(f32, f32)>, confidence: Option<f32>) -> Self {
        Self { text: text.into(), points, confidence }
    }

    /// Axis-aligned box helper for engines that report rectangles.
    pub fn from_box(
        text: impl Into<String>,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        confidence: Option<f32>,
    ) -> Self {
        Self::new(
            text,
            vec![(x, y), (x + width, y), (x + width, y + height), (x, y + height)],
            confidence,
        )
    }

    /// Vertical center of the bounding region.
    pub fn y_center(&self) -> f32 {
        let Some(first) = self.points.first() else { return 0.0 };
        let (min, max) = self.points.iter().fold((first.1, first.1), |(mn, mx), p| {
            (mn.min(p.1), mx.max(p.1))
        });
        (min + max) / 2.0
    }

    /// Leftmost x — the ordering key for fragments within a line.
    pub fn x_min(&self) -> f32 {
        self.points
            .iter()
            .map(|p| p.0)
            .fold(f32::INFINITY, f32::min)
    }
}

/// Abstraction over one recognition engine. Implementations are
/// constructed once at startup and invoked repeatedly; they must not
/// require per-document re-initialization.
pub trait OcrEngine: Send + Sync {
    /// Engine identifier used in logs and results (e.g. "tesseract").
    fn name(&self) -> &'static str;

    /// Recognize text fragments in an image. Errors are absorbed by
    /// the pipeline into an empty result, so a broken engine can never
    /// abort the ensemble.
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Detection>, EngineError>;
}

/// One synthetic full-width detection per text line, for backends
/// that only report plain text without positions.
pub(crate) fn synthetic_line_detections(text: &str) -> Vec<Detection> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| Detection::from_box(line.trim(), 0.0, i as f32 * 40.0, 1000.0, 30.0, None))
        .collect()
}

// ── Mock engine (always available, used for tests) ────────────────────────────

/// Returns preset detections regardless of the image — lets the
/// consolidation and pipeline logic be exercised without any real
/// recognition backend installed.
pub struct MockEngine {
    name: &'static str,
    detections: Vec<Detection>,
}

impl MockEngine {
    pub fn new(name: &'static str, detections: Vec<Detection>) -> Self {
        Self { name, detections }
    }

    /// Build from plain text, one synthetic detection per line.
    pub fn from_text(name: &'static str, text: &str) -> Self {
        Self::new(name, synthetic_line_detections(text))
    }
}

impl OcrEngine for MockEngine {
    fn name(&self) -> &'static str {
        self.name
    }

    fn recognize(&self, _image: &DynamicImage) -> Result<Vec<Detection>, EngineError> {
        Ok(self.detections.clone())
    }
}

// ── Tesseract engine (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract {
    use super::{synthetic_line_detections, Detection, EngineError, OcrEngine};
    use image::DynamicImage;
    use leptess::LepTess;

    /// Tesseract reports plain text; the adapter synthesizes one
    /// detection per line so the normalizer sees the same shape as
    /// position-reporting engines.
    pub struct TesseractEngine {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractEngine {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrEngine for TesseractEngine {
        fn name(&self) -> &'static str {
            "tesseract"
        }

        fn recognize(&self, image: &DynamicImage) -> Result<Vec<Detection>, EngineError> {
            let png = crate::preprocess::encode_png(image)
                .map_err(|e| EngineError::Encode(e.to_string()))?;
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| EngineError::Engine(e.to_string()))?;
            lt.set_image_from_mem(&png)
                .map_err(|e| EngineError::Encode(e.to_string()))?;
            let text = lt
                .get_utf8_text()
                .map_err(|e| EngineError::Engine(e.to_string()))?;
            Ok(synthetic_line_detections(&text))
        }
    }
}
