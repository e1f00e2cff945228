//! Fixed names and thresholds shared across the pipeline.

/// Name of the built-in default preset.
pub const DEFAULT_PRESET_NAME: &str = "MagicSparkle";

/// Name given to the default preset when it is returned after a failed translation.
pub const FALLBACK_PRESET_NAME: &str = "ErrorFallback";

/// Opacity at or below which a simple-color endpoint counts as invisible.
pub const VISIBILITY_EPSILON: f32 = 0.05;

/// Noise strength applied when a turbulence texture is set without a strength.
pub const DEFAULT_NOISE_STRENGTH: f32 = 10.0;

/// MIME prefix of inline SVG resource references.
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

/// Upper bound on a generated SVG payload before it is rejected.
pub const MAX_INLINE_SVG_BYTES: usize = 64 * 1024;
