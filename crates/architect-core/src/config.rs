use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_PRESET_NAME, FALLBACK_PRESET_NAME};
use crate::resource::default_texture_url;

/// Plain 3-component vector as exchanged in JSON (`{ "x": .., "y": .., "z": .. }`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

/// One stop of a multi-color ramp. Stops need not be stored sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampGradient {
    /// Position along the particle lifetime (0.0–1.0).
    pub gradient: f32,
    /// Hex color, `#RRGGBB`.
    pub color: String,
    /// Opacity at this stop (0.0–1.0).
    pub opacity: f32,
}

/// How particles are composited onto the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Additive blending.
    #[default]
    #[serde(rename = "ONEONE")]
    OneOne,
    /// Alpha blending.
    #[serde(rename = "STANDARD")]
    Standard,
}

/// The canonical particle effect configuration.
///
/// Instances are replaced wholesale, never patched in place: every translation
/// either yields a complete new value or leaves the previous one untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleConfig {
    pub name: String,

    // Emitter
    #[serde(deserialize_with = "deserialize_count")]
    pub capacity: u32,
    pub emit_rate: f32,

    // Lifecycle
    pub min_life_time: f32,
    pub max_life_time: f32,

    // Size
    pub min_size: f32,
    pub max_size: f32,

    // Speed & force
    pub min_emit_power: f32,
    pub max_emit_power: f32,
    pub update_speed: f32,
    pub gravity: Vector3,

    // Simple color model
    pub color1: String,
    pub color2: String,
    pub color_dead: String,
    /// Lifetime position of `color2` (0.0–1.0).
    pub color_mid_point: f32,
    pub start_alpha: f32,
    pub end_alpha: f32,

    // Ramp color model
    #[serde(default)]
    pub use_ramp_gradients: bool,
    #[serde(default)]
    pub ramp_gradients: Vec<RampGradient>,

    // Emission cone and volume
    pub direction1: Vector3,
    pub direction2: Vector3,
    pub min_emit_box: Vector3,
    pub max_emit_box: Vector3,

    // Visual shape
    pub texture_url: String,
    pub blend_mode: BlendMode,

    // Turbulence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_texture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_strength: Option<Vector3>,

    #[serde(deserialize_with = "deserialize_count")]
    pub pre_warm_cycles: u32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PRESET_NAME.to_string(),
            capacity: 2000,
            emit_rate: 100.0,
            min_life_time: 0.5,
            max_life_time: 1.5,
            min_size: 0.1,
            max_size: 0.5,
            min_emit_power: 1.0,
            max_emit_power: 3.0,
            update_speed: 0.01,
            gravity: Vector3::new(0.0, -9.81, 0.0),
            color1: "#ffffff".to_string(),
            color2: "#ffaa00".to_string(),
            color_dead: "#000000".to_string(),
            color_mid_point: 0.5,
            start_alpha: 1.0,
            end_alpha: 0.0,
            use_ramp_gradients: false,
            ramp_gradients: Vec::new(),
            direction1: Vector3::new(-1.0, 1.0, -1.0),
            direction2: Vector3::new(1.0, 1.0, 1.0),
            min_emit_box: Vector3::new(-0.5, 0.0, -0.5),
            max_emit_box: Vector3::new(0.5, 0.0, 0.5),
            texture_url: default_texture_url(),
            blend_mode: BlendMode::OneOne,
            noise_texture_url: None,
            noise_strength: Some(Vector3::new(10.0, 10.0, 10.0)),
            pre_warm_cycles: 0,
        }
    }
}

impl ParticleConfig {
    /// The fixed configuration returned when a translation fails without a base.
    pub fn fallback() -> Self {
        Self {
            name: FALLBACK_PRESET_NAME.to_string(),
            ..Self::default()
        }
    }

    /// Whether the ramp color model drives rendering. An enabled ramp with no
    /// stops renders with the simple color model.
    pub fn uses_ramp(&self) -> bool {
        self.use_ramp_gradients && !self.ramp_gradients.is_empty()
    }

    /// The noise reference, if one is set and non-empty.
    pub fn noise_reference(&self) -> Option<&str> {
        self.noise_texture_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

/// Accepts any JSON number for integer counts. Generated text often writes
/// `2000.0` where an integer is expected.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(D::Error::custom("count must be a finite number"));
    }
    Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
}

/// Overlay `fields` onto `template`, one key at a time.
///
/// A key whose value does not fit the field's type is dropped and the template
/// value kept; the dropped keys are returned alongside the merged config.
/// Keys that are not config fields are ignored.
pub fn merge_fields(
    template: &ParticleConfig,
    fields: &Map<String, Value>,
) -> (ParticleConfig, Vec<String>) {
    let mut merged = match serde_json::to_value(template) {
        Ok(Value::Object(map)) => map,
        _ => return (template.clone(), fields.keys().cloned().collect()),
    };

    let mut rejected = Vec::new();
    for (key, value) in fields {
        let previous = merged.insert(key.clone(), value.clone());
        if serde_json::from_value::<ParticleConfig>(Value::Object(merged.clone())).is_err() {
            match previous {
                Some(prev) => merged.insert(key.clone(), prev),
                None => merged.remove(key),
            };
            rejected.push(key.clone());
        }
    }

    if !rejected.is_empty() {
        log::debug!("Dropped ill-typed config fields: {:?}", rejected);
    }

    let config = serde_json::from_value(Value::Object(merged)).unwrap_or_else(|_| template.clone());
    (config, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_field_names() {
        let value = serde_json::to_value(ParticleConfig::default()).expect("should serialize");
        let map = value.as_object().expect("object");
        for key in [
            "minLifeTime",
            "emitRate",
            "colorDead",
            "colorMidPoint",
            "useRampGradients",
            "rampGradients",
            "minEmitBox",
            "textureUrl",
            "blendMode",
            "preWarmCycles",
        ] {
            assert!(map.contains_key(key), "missing key {key}");
        }
        assert_eq!(map["blendMode"], json!("ONEONE"));
        assert!(!map.contains_key("noiseTextureUrl"));
    }

    #[test]
    fn test_count_accepts_float() {
        let mut value = serde_json::to_value(ParticleConfig::default()).expect("should serialize");
        value["capacity"] = json!(1499.6);
        value["preWarmCycles"] = json!(-3);
        let config: ParticleConfig = serde_json::from_value(value).expect("should parse");
        assert_eq!(config.capacity, 1500);
        assert_eq!(config.pre_warm_cycles, 0);
    }

    #[test]
    fn test_fallback_is_named() {
        let fallback = ParticleConfig::fallback();
        assert_eq!(fallback.name, FALLBACK_PRESET_NAME);
        assert_eq!(fallback.capacity, ParticleConfig::default().capacity);
    }

    #[test]
    fn test_empty_ramp_is_simple_mode() {
        let mut config = ParticleConfig {
            use_ramp_gradients: true,
            ..ParticleConfig::default()
        };
        assert!(!config.uses_ramp());
        config.ramp_gradients.push(RampGradient {
            gradient: 0.0,
            color: "#ff0000".into(),
            opacity: 1.0,
        });
        assert!(config.uses_ramp());
    }

    #[test]
    fn test_blank_noise_reference_is_none() {
        let config = ParticleConfig {
            noise_texture_url: Some("  ".into()),
            ..ParticleConfig::default()
        };
        assert_eq!(config.noise_reference(), None);
    }

    #[test]
    fn test_merge_overlays_valid_fields() {
        let fields = json!({
            "name": "Embers",
            "emitRate": 250,
            "gravity": { "x": 0.0, "y": 2.0, "z": 0.0 },
            "blendMode": "STANDARD",
        });
        let (config, rejected) =
            merge_fields(&ParticleConfig::default(), fields.as_object().expect("object"));
        assert!(rejected.is_empty());
        assert_eq!(config.name, "Embers");
        assert_eq!(config.emit_rate, 250.0);
        assert_eq!(config.gravity, Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(config.blend_mode, BlendMode::Standard);
        assert_eq!(config.capacity, 2000);
    }

    #[test]
    fn test_merge_drops_ill_typed_fields() {
        let fields = json!({
            "name": "Storm",
            "capacity": "lots",
            "blendMode": "MULTIPLY",
            "gravity": null,
            "textureID": "FLAME",
        });
        let template = ParticleConfig::default();
        let (config, mut rejected) = merge_fields(&template, fields.as_object().expect("object"));
        rejected.sort();
        assert_eq!(rejected, vec!["blendMode", "capacity", "gravity"]);
        assert_eq!(config.name, "Storm");
        assert_eq!(config.capacity, template.capacity);
        assert_eq!(config.gravity, template.gravity);
    }

    #[test]
    fn test_vector_glam_conversion() {
        let v = Vector3::new(1.0, -2.0, 3.5);
        let g: glam::Vec3 = v.into();
        assert_eq!(g, glam::Vec3::new(1.0, -2.0, 3.5));
        assert_eq!(Vector3::from(g), v);
    }
}
