use crate::kernel::services::ports::GenerationError;
use crate::models::{NodeId, UploadError};
use std::path::PathBuf;

#[derive(Debug)]
pub enum AppMessage {
    UploadRead {
        path: PathBuf,
        parent: Option<NodeId>,
        name: String,
        mime: String,
        bytes: Vec<u8>,
    },
    UploadFailed {
        path: PathBuf,
        error: UploadError,
    },
    GenerationFinished {
        file: NodeId,
        result: Result<String, GenerationError>,
    },
}
