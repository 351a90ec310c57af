use std::path::PathBuf;

use crate::bundler::Bundle;
use crate::kernel::services::bus::BridgeSender;
use crate::models::NodeId;

#[derive(Debug, Clone)]
pub enum Effect {
    LoadPreview {
        bundle: Box<Bundle>,
        bridge: BridgeSender,
    },
    UnloadPreview,
    ReadUpload {
        path: PathBuf,
        parent: Option<NodeId>,
    },
    Generate {
        file: NodeId,
        prompt: String,
        current: String,
    },
}
