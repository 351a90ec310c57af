//! 应用层：驱动 Store，执行副作用

mod sketchpad;

pub use sketchpad::{AppError, Sketchpad};
