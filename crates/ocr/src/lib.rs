pub mod consolidate;
pub mod engine;
pub mod normalize;
pub mod pipeline;
pub mod preprocess;

pub use consolidate::{consolidate, ConsolidateError};
pub use engine::{Detection, EngineError, MockEngine, OcrEngine};
pub use normalize::{group_into_lines, EngineResult, Line, DEFAULT_LINE_THRESHOLD};
pub use pipeline::{DocumentPipeline, PipelineError};
pub use preprocess::{encode_png, preprocess, PreprocessError};
