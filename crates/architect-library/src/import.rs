use architect_core::{merge_fields, ParticleConfig};
use serde_json::Value;

use crate::error::LibraryError;

/// Parse exported presets: a single config object or an array of them.
///
/// Each object is laid over the default config, so partial or older exports
/// still load. Array entries that are not objects are skipped.
pub fn import_presets(json: &str) -> Result<Vec<ParticleConfig>, LibraryError> {
    let value: Value = serde_json::from_str(json).map_err(|e| LibraryError::Parse(e.to_string()))?;

    let entries = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            log::warn!("Import root is neither an object nor an array: {other}");
            Vec::new()
        }
    };

    let template = ParticleConfig::default();
    let mut imported = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let Value::Object(fields) = entry else {
            log::warn!("Skipping import entry {i}: not an object");
            continue;
        };
        let (preset, rejected) = merge_fields(&template, &fields);
        if !rejected.is_empty() {
            log::warn!(
                "Import entry {i} ('{}'): ignored fields {}",
                preset.name,
                rejected.join(", ")
            );
        }
        imported.push(preset);
    }

    if imported.is_empty() {
        return Err(LibraryError::Empty);
    }
    log::info!("Imported {} preset(s)", imported.len());
    Ok(imported)
}
