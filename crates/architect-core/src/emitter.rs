use glam::{Vec3, Vec4};

use crate::color::parse_hex_rgba;
use crate::config::{BlendMode, ParticleConfig};
use crate::constants::DEFAULT_NOISE_STRENGTH;
use crate::error::ColorError;

/// A color keyed to a point in the particle lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f32,
    pub color: Vec4,
}

/// Turbulence texture and per-axis strength.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseParams {
    pub texture: String,
    pub strength: Vec3,
}

/// Flat, renderer-ready view of a [`ParticleConfig`].
///
/// Colors are resolved to RGBA and both color models collapse into a single
/// ordered list of lifetime stops.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterParams {
    pub capacity: u32,
    pub emit_rate: f32,
    pub life_time: (f32, f32),
    pub size: (f32, f32),
    pub emit_power: (f32, f32),
    pub update_speed: f32,
    pub gravity: Vec3,
    pub direction1: Vec3,
    pub direction2: Vec3,
    pub min_emit_box: Vec3,
    pub max_emit_box: Vec3,
    pub color_stops: Vec<ColorStop>,
    pub texture: String,
    pub blend_mode: BlendMode,
    pub noise: Option<NoiseParams>,
    /// Only set when the config asks for at least one cycle.
    pub pre_warm_cycles: Option<u32>,
}

impl EmitterParams {
    pub fn from_config(config: &ParticleConfig) -> Result<Self, ColorError> {
        let noise = config.noise_reference().map(|texture| NoiseParams {
            texture: texture.to_string(),
            strength: config
                .noise_strength
                .map(Vec3::from)
                .unwrap_or(Vec3::splat(DEFAULT_NOISE_STRENGTH)),
        });

        Ok(Self {
            capacity: config.capacity,
            emit_rate: config.emit_rate,
            life_time: (config.min_life_time, config.max_life_time),
            size: (config.min_size, config.max_size),
            emit_power: (config.min_emit_power, config.max_emit_power),
            update_speed: config.update_speed,
            gravity: config.gravity.into(),
            direction1: config.direction1.into(),
            direction2: config.direction2.into(),
            min_emit_box: config.min_emit_box.into(),
            max_emit_box: config.max_emit_box.into(),
            color_stops: color_stops(config)?,
            texture: config.texture_url.clone(),
            blend_mode: config.blend_mode,
            noise,
            pre_warm_cycles: (config.pre_warm_cycles > 0).then_some(config.pre_warm_cycles),
        })
    }
}

/// Lifetime color stops for either color model, sorted by position.
pub fn color_stops(config: &ParticleConfig) -> Result<Vec<ColorStop>, ColorError> {
    let mut stops = if config.uses_ramp() {
        config
            .ramp_gradients
            .iter()
            .map(|g| {
                Ok(ColorStop {
                    position: g.gradient,
                    color: parse_hex_rgba(&g.color, g.opacity)?,
                })
            })
            .collect::<Result<Vec<_>, ColorError>>()?
    } else {
        vec![
            ColorStop {
                position: 0.0,
                color: parse_hex_rgba(&config.color1, config.start_alpha)?,
            },
            ColorStop {
                position: config.color_mid_point,
                color: parse_hex_rgba(&config.color2, config.end_alpha)?,
            },
            ColorStop {
                position: 1.0,
                color: parse_hex_rgba(&config.color_dead, 0.0)?,
            },
        ]
    };

    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
    Ok(stops)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RampGradient, Vector3};

    #[test]
    fn test_simple_mode_stops() {
        let config = ParticleConfig::default();
        let stops = color_stops(&config).expect("default colors parse");
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].position, 0.0);
        assert_eq!(stops[0].color, Vec4::new(1.0, 1.0, 1.0, 1.0));
        assert_eq!(stops[1].position, 0.5);
        assert_eq!(stops[1].color.w, 0.0);
        assert_eq!(stops[2].color, Vec4::ZERO);
    }

    #[test]
    fn test_ramp_stops_sorted() {
        let config = ParticleConfig {
            use_ramp_gradients: true,
            ramp_gradients: vec![
                RampGradient {
                    gradient: 1.0,
                    color: "#000000".into(),
                    opacity: 0.0,
                },
                RampGradient {
                    gradient: 0.0,
                    color: "#ffff00".into(),
                    opacity: 1.0,
                },
                RampGradient {
                    gradient: 0.4,
                    color: "#ff0000".into(),
                    opacity: 0.8,
                },
            ],
            ..ParticleConfig::default()
        };
        let stops = color_stops(&config).expect("ramp colors parse");
        let positions: Vec<f32> = stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.4, 1.0]);
        assert_eq!(stops[1].color, Vec4::new(1.0, 0.0, 0.0, 0.8));
    }

    #[test]
    fn test_bad_color_is_reported() {
        let config = ParticleConfig {
            color2: "sunset".into(),
            ..ParticleConfig::default()
        };
        assert_eq!(
            color_stops(&config),
            Err(ColorError::InvalidHex("sunset".into()))
        );
    }

    #[test]
    fn test_noise_only_with_reference() {
        let mut config = ParticleConfig::default();
        let params = EmitterParams::from_config(&config).expect("should build");
        assert!(params.noise.is_none());
        assert!(params.pre_warm_cycles.is_none());

        config.noise_texture_url = Some("textures/noise/perlin.png".into());
        config.noise_strength = None;
        config.pre_warm_cycles = 20;
        config.gravity = Vector3::new(0.0, 1.0, 0.0);
        let params = EmitterParams::from_config(&config).expect("should build");
        let noise = params.noise.expect("noise set");
        assert_eq!(noise.strength, Vec3::splat(DEFAULT_NOISE_STRENGTH));
        assert_eq!(params.pre_warm_cycles, Some(20));
        assert_eq!(params.gravity, Vec3::Y);
    }
}
