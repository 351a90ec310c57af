use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// 失败信息原样展示给用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError(pub String);

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for GenerationError {}

pub type GenerationFuture = Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send>>;

/// 代码生成协作者：`(prompt, 当前脚本内容)` -> 替换内容
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, prompt: String, current: String) -> GenerationFuture;
}

/// 去掉模型偶尔带上的 markdown 代码围栏
pub fn clean_generated_code(raw: &str) -> String {
    raw.replace("```javascript", "")
        .replace("```js", "")
        .replace("```", "")
        .trim()
        .to_string()
}
