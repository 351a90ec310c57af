//! 工作区驱动：持有 Store、后台运行时与预览宿主

use crate::kernel::services::adapters::{AppMessage, AsyncRuntime};
use crate::kernel::services::ports::{CodeGenerator, PreviewError, PreviewHost};
use crate::kernel::{AppState, Store, StoreError};
use std::fmt;
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

mod bridge;
mod tick;

const MAX_MESSAGE_DRAIN_PER_TICK: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Store(StoreError),
    Preview(PreviewError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Store(e) => write!(f, "{}", e),
            AppError::Preview(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl From<PreviewError> for AppError {
    fn from(e: PreviewError) -> Self {
        AppError::Preview(e)
    }
}

pub struct Sketchpad {
    store: Store,
    runtime: AsyncRuntime,
    rx: Receiver<AppMessage>,
    preview: Box<dyn PreviewHost>,
    generator: Option<Arc<dyn CodeGenerator>>,
}

impl Sketchpad {
    pub fn new(state: AppState, preview: Box<dyn PreviewHost>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let runtime = AsyncRuntime::new(tx)?;
        Ok(Self {
            store: Store::new(state),
            runtime,
            rx,
            preview,
            generator: None,
        })
    }

    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }
}
