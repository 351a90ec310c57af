//! Service ports: traits + data contracts.

pub mod config;
pub mod generation;
pub mod preview;

pub use config::{SketchpadConfig, DEFAULT_SKETCH};
pub use generation::{clean_generated_code, CodeGenerator, GenerationError, GenerationFuture};
pub use preview::{PreviewError, PreviewHost};
