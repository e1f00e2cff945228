pub mod color;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod resource;

pub use config::{merge_fields, BlendMode, ParticleConfig, RampGradient, Vector3};
pub use emitter::{ColorStop, EmitterParams, NoiseParams};
pub use error::{ColorError, ResourceError};
