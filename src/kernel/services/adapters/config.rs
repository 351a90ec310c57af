//! 配置服务：持有当前生效的配置
//!
//! 启动时从配置文件加载，文件缺失或损坏时使用默认值。

use super::settings::{ensure_settings_file, load_settings, load_settings_from};
use crate::bundler::BundleOptions;
use crate::kernel::services::ports::SketchpadConfig;
use std::path::Path;

pub struct ConfigService {
    config: SketchpadConfig,
}

impl ConfigService {
    pub fn new() -> Self {
        Self {
            config: SketchpadConfig::default(),
        }
    }

    pub fn with_config(config: SketchpadConfig) -> Self {
        Self { config }
    }

    /// 从用户配置目录加载
    pub fn load() -> Self {
        if let Err(e) = ensure_settings_file() {
            tracing::warn!(error = %e, "cannot create settings file");
        }
        Self::with_config(load_settings().unwrap_or_default())
    }

    pub fn load_from(path: &Path) -> Self {
        Self::with_config(load_settings_from(path).unwrap_or_default())
    }

    pub fn config(&self) -> &SketchpadConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SketchpadConfig {
        &mut self.config
    }

    pub fn bundle_options(&self) -> BundleOptions {
        self.config.bundle_options()
    }

    pub fn into_config(self) -> SketchpadConfig {
        self.config
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/config.rs"]
mod tests;
