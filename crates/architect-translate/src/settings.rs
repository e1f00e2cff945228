use architect_core::constants::{MAX_INLINE_SVG_BYTES, VISIBILITY_EPSILON};
use serde::{Deserialize, Serialize};

/// Tunables for one translator instance, loadable from RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorSettings {
    /// Model identifier forwarded to the generation service.
    pub model: String,
    /// Output token ceiling forwarded to the generation service.
    pub max_output_tokens: u32,
    /// Opacity at or below which both simple-color endpoints count as invisible.
    pub visibility_epsilon: f32,
    /// Largest generated SVG payload accepted as a particle shape.
    pub max_inline_svg_bytes: usize,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            model: "gemini-3-pro-preview".to_string(),
            max_output_tokens: 8192,
            visibility_epsilon: VISIBILITY_EPSILON,
            max_inline_svg_bytes: MAX_INLINE_SVG_BYTES,
        }
    }
}
