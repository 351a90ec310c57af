use crate::bundler::{BundleOptions, DEFAULT_LIBRARY_URL, DEFAULT_ORIGIN_TAG};
use crate::models::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SKETCH: &str = r#"function setup() {
  createCanvas(windowWidth, windowHeight);
  background(20);
  noStroke();
}

function draw() {
  let x = mouseX;
  let y = mouseY;

  background(20, 10);

  fill(255, 150);
  circle(x, height/2, 20);
}

function windowResized() {
  resizeCanvas(windowWidth, windowHeight);
  background(20);
}"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchpadConfig {
    pub entry_name: String,
    pub script_extension: String,
    pub new_script_template: String,
    pub default_sketch: String,
    pub library_url: String,
    pub origin_tag: String,
    pub history_limit: usize,
}

impl Default for SketchpadConfig {
    fn default() -> Self {
        Self {
            entry_name: "sketch.js".to_string(),
            script_extension: ".js".to_string(),
            new_script_template: "// New file".to_string(),
            default_sketch: DEFAULT_SKETCH.to_string(),
            library_url: DEFAULT_LIBRARY_URL.to_string(),
            origin_tag: DEFAULT_ORIGIN_TAG.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl SketchpadConfig {
    pub fn bundle_options(&self) -> BundleOptions {
        BundleOptions {
            library_url: self.library_url.clone(),
            origin_tag: self.origin_tag.clone(),
        }
    }
}
