//! sketchpad - 浏览器草图工作区的无界面核心
//!
//! 模块结构：
//! - models: 数据模型（FileTree, HistoryStore, ResourceStore）
//! - bundler: 打包器（资源替换、HTML 执行外壳）
//! - kernel: 状态/动作/副作用，以及服务层（桥接通道、配置、后台运行时、预览宿主）
//! - app: 应用层（Sketchpad 驱动）

pub mod app;
pub mod bundler;
pub mod kernel;
pub mod models;
