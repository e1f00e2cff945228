//! Engine-facing export formats.
//!
//! The runtime form bakes opacity into the colors as an `RRGGBBAA` suffix,
//! which is what the in-game loader reads.

use architect_core::color::hex_alpha;
use architect_core::ParticleConfig;
use serde_json::Value;

use crate::error::LibraryError;

/// The config as the runtime loader consumes it.
pub fn runtime_config(config: &ParticleConfig) -> Result<Value, LibraryError> {
    let mut value =
        serde_json::to_value(config).map_err(|e| LibraryError::Serialize(e.to_string()))?;
    value["color1"] = Value::String(format!("{}{}", config.color1, hex_alpha(config.start_alpha)));
    value["color2"] = Value::String(format!("{}{}", config.color2, hex_alpha(config.end_alpha)));
    value["colorDead"] = Value::String(format!("{}00", config.color_dead));
    Ok(value)
}

/// A self-contained script defining `EFFECT_LIBRARY`, keyed by preset name.
pub fn bundle_script(configs: &[ParticleConfig]) -> Result<String, LibraryError> {
    let mut entries = Vec::with_capacity(configs.len());
    for config in configs {
        let key = serde_json::to_string(&config.name)
            .map_err(|e| LibraryError::Serialize(e.to_string()))?;
        let body = runtime_config(config)?;
        entries.push(format!("{key}: {body}"));
    }
    Ok(format!(
        "(() => {{ const EFFECT_LIBRARY = {{ {} }}; }})();",
        entries.join(",")
    ))
}
