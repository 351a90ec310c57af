//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod config;
pub mod paths;
pub mod preview;
pub mod project;
pub mod runtime;
pub mod settings;

pub use config::ConfigService;
pub use paths::{ensure_log_dir, get_app_data_dir, get_log_dir, get_settings_dir};
pub use preview::FilePreviewHost;
pub use project::{import_project, should_ignore, ImportedProject};
pub use runtime::{AppMessage, AsyncRuntime};
pub use settings::{ensure_settings_file, get_settings_path, load_settings, load_settings_from};
