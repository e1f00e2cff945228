use architect_core::ParticleConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::{Catalogs, CUSTOM_SYMBOL};

/// Raw resource fields that are never sent over the text channel.
pub const RESOURCE_FIELDS: &[&str] = &["textureUrl", "noiseTextureUrl"];

/// Fields that only exist in the compact form.
pub const COMPACT_ONLY_FIELDS: &[&str] = &["textureID", "noiseTextureID", "customSVG"];

/// Text-safe variant of [`ParticleConfig`]: resource references are replaced
/// by catalog symbols.
///
/// `custom_svg` is declared last so it is always serialized last. A response
/// that corrupts it can then be truncated without losing other fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactConfig {
    /// Every config field except the raw resource references.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(rename = "textureID")]
    pub texture_id: String,
    #[serde(rename = "noiseTextureID", default, skip_serializing_if = "Option::is_none")]
    pub noise_texture_id: Option<String>,
    #[serde(rename = "customSVG", default, skip_serializing_if = "Option::is_none")]
    pub custom_svg: Option<String>,
}

impl CompactConfig {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result of compressing a config, with what is needed to undo it.
#[derive(Debug, Clone, PartialEq)]
pub struct Compressed {
    pub compact: CompactConfig,
    /// Symbol sent for the shape (`CUSTOM` when uncataloged).
    pub resolved_shape_symbol: String,
    /// Shape reference as it was before compression, byte for byte.
    pub original_shape_ref: String,
    /// Symbol sent for the noise texture, if any.
    pub resolved_noise_symbol: Option<String>,
    /// Noise reference as it was before compression.
    pub original_noise_ref: Option<String>,
}

/// Replace resource references with catalog symbols. Never fails.
pub fn compress(full: &ParticleConfig, catalogs: &Catalogs) -> Compressed {
    let mut fields = match serde_json::to_value(full) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for key in RESOURCE_FIELDS {
        fields.remove(*key);
    }

    let shape_symbol = catalogs
        .shapes
        .symbol(&full.texture_url)
        .unwrap_or(CUSTOM_SYMBOL)
        .to_string();

    let noise_ref = full.noise_reference();
    let noise_symbol = noise_ref.map(|url| {
        catalogs
            .noise
            .symbol(url)
            .unwrap_or(CUSTOM_SYMBOL)
            .to_string()
    });

    Compressed {
        compact: CompactConfig {
            fields,
            texture_id: shape_symbol.clone(),
            noise_texture_id: noise_symbol.clone(),
            custom_svg: None,
        },
        resolved_shape_symbol: shape_symbol,
        original_shape_ref: full.texture_url.clone(),
        resolved_noise_symbol: noise_symbol,
        original_noise_ref: noise_ref.map(str::to_string),
    }
}
