use serde_json::{json, Map, Value};

use crate::catalog::{Catalogs, CUSTOM_SYMBOL, GENERATED_SYMBOL};
use crate::decode::INLINE_PAYLOAD_FIELD;
use crate::settings::TranslatorSettings;

/// Everything handed to the generation service for one translation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub max_output_tokens: u32,
    pub system_instruction: String,
    pub contents: String,
    /// Compact JSON of the config being modified, if any.
    pub compact: Option<String>,
    /// Expected output shape. A hint only; responses are always fully decoded.
    pub response_schema: Value,
}

/// Assemble the outbound request for `prompt`.
///
/// `compact` is the compact JSON of the base config when modifying one.
/// `force_new_shape` demands a freshly generated shape.
pub fn build_request(
    prompt: &str,
    compact: Option<&str>,
    catalogs: &Catalogs,
    settings: &TranslatorSettings,
    force_new_shape: bool,
) -> GenerationRequest {
    let contents = match compact {
        Some(existing) => format!(
            "You are modifying an existing particle system.\n\n\
             Existing Configuration:\n{existing}\n\n\
             User Request for Modification:\n\"{prompt}\"\n\n\
             Return the fully updated JSON configuration."
        ),
        None => format!("Generate a particle system configuration for: \"{prompt}\""),
    };

    GenerationRequest {
        model: settings.model.clone(),
        max_output_tokens: settings.max_output_tokens,
        system_instruction: system_instruction(prompt, catalogs, force_new_shape),
        contents,
        compact: compact.map(str::to_string),
        response_schema: response_schema(catalogs),
    }
}

fn system_instruction(prompt: &str, catalogs: &Catalogs, force_new_shape: bool) -> String {
    let shape_list = catalogs.shapes.symbols().collect::<Vec<_>>().join(", ");
    let noise_list = catalogs
        .noise
        .symbols()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ");

    let shape_rules = if force_new_shape {
        format!(
            "CRITICAL SHAPE INSTRUCTION:\n\
             The user explicitly requested a NEW GENERATED SHAPE.\n\
             1. You MUST set textureID to '{GENERATED_SYMBOL}'.\n\
             2. You MUST create a new '{INLINE_PAYLOAD_FIELD}' string that visually matches the user's prompt (\"{prompt}\").\n\
             3. The SVG must be white fill on a transparent background.\n\
             4. JSON SAFETY: inside '{INLINE_PAYLOAD_FIELD}' use SINGLE QUOTES (') for all XML attributes."
        )
    } else {
        format!(
            "TEXTURE LOGIC:\n\
             - If the user asks for a shape NOT in the list below, set textureID to '{GENERATED_SYMBOL}'.\n\
             - If textureID is '{GENERATED_SYMBOL}', provide a simple SVG XML string in '{INLINE_PAYLOAD_FIELD}'.\n\
             - JSON SAFETY: inside '{INLINE_PAYLOAD_FIELD}' use SINGLE QUOTES (') for all XML attributes."
        )
    };

    format!(
        "You are an expert in real-time particle systems.\n\
         Generate a JSON configuration based on the user's description.\n\n\
         Rules:\n\
         1. Return ONLY the JSON object.\n\
         2. For colors, use hex codes.\n\
         3. CRITICAL: DO NOT OUTPUT 'textureUrl'. Use 'textureID'.\n\
         4. ORDERING: place '{INLINE_PAYLOAD_FIELD}' as the LAST property of the JSON object.\n\n\
         {shape_rules}\n\n\
         TEXTURE ID LIST:\n\
         - {shape_list}\n\
         - {CUSTOM_SYMBOL} (preserve the existing custom texture)\n\
         - {GENERATED_SYMBOL} (create a new SVG in {INLINE_PAYLOAD_FIELD})\n\n\
         NOISE & TURBULENCE:\n\
         - Use 'noiseTextureID' if the effect needs smoke, fire, plasma or chaotic movement.\n\
         - Valid noise IDs: {noise_list}.\n\
         - If using noise, set 'noiseStrength' (e.g. {{x:10, y:10, z:10}}).\n\n\
         ADVANCED GRADIENTS:\n\
         - Use 'useRampGradients: true' and a 'rampGradients' array for rainbow, multi-color or complex color shifts.\n\
         - 'rampGradients' items: {{ gradient: 0-1, color: \"#HEX\", opacity: 0-1 }}\n\n\
         VISIBILITY SAFETY:\n\
         - If 'useRampGradients' is false, 'startAlpha' and 'endAlpha' must not both be 0."
    )
}

fn vector_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "x": { "type": "number" },
            "y": { "type": "number" },
            "z": { "type": "number" },
        },
        "required": ["x", "y", "z"],
    })
}

const NUMBER_FIELDS: &[&str] = &[
    "capacity",
    "emitRate",
    "minLifeTime",
    "maxLifeTime",
    "minSize",
    "maxSize",
    "minEmitPower",
    "maxEmitPower",
    "updateSpeed",
    "colorMidPoint",
    "startAlpha",
    "endAlpha",
    "preWarmCycles",
];

const STRING_FIELDS: &[&str] = &["name", "color1", "color2", "colorDead"];

const VECTOR_FIELDS: &[&str] = &[
    "gravity",
    "noiseStrength",
    "direction1",
    "direction2",
    "minEmitBox",
    "maxEmitBox",
];

const REQUIRED_FIELDS: &[&str] = &[
    "name",
    "capacity",
    "emitRate",
    "minLifeTime",
    "maxLifeTime",
    "minSize",
    "maxSize",
    "minEmitPower",
    "maxEmitPower",
    "updateSpeed",
    "gravity",
    "color1",
    "color2",
    "colorDead",
    "direction1",
    "direction2",
    "minEmitBox",
    "maxEmitBox",
    "textureID",
    "blendMode",
    "preWarmCycles",
];

/// JSON schema of the compact config, with symbol enumerations.
pub fn response_schema(catalogs: &Catalogs) -> Value {
    let mut shape_ids: Vec<&str> = catalogs.shapes.symbols().collect();
    shape_ids.extend([GENERATED_SYMBOL, CUSTOM_SYMBOL]);
    let noise_ids: Vec<&str> = catalogs.noise.symbols().collect();

    let mut properties = Map::new();
    for field in NUMBER_FIELDS {
        properties.insert(field.to_string(), json!({ "type": "number" }));
    }
    for field in STRING_FIELDS {
        properties.insert(field.to_string(), json!({ "type": "string" }));
    }
    for field in VECTOR_FIELDS {
        properties.insert(field.to_string(), vector_schema());
    }
    properties.insert("useRampGradients".into(), json!({ "type": "boolean" }));
    properties.insert(
        "rampGradients".into(),
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "gradient": { "type": "number" },
                    "color": { "type": "string" },
                    "opacity": { "type": "number" },
                },
                "required": ["gradient", "color", "opacity"],
            },
        }),
    );
    properties.insert(
        "noiseTextureID".into(),
        json!({ "type": "string", "enum": noise_ids }),
    );
    properties.insert(
        "textureID".into(),
        json!({ "type": "string", "enum": shape_ids }),
    );
    properties.insert(
        "blendMode".into(),
        json!({ "type": "string", "enum": ["ONEONE", "STANDARD"] }),
    );
    properties.insert(
        INLINE_PAYLOAD_FIELD.into(),
        json!({
            "type": "string",
            "description": "Single-line SVG XML string (64x64) if textureID is GENERATED. Attributes must use single quotes. Place this field LAST.",
        }),
    );

    json!({
        "type": "object",
        "properties": properties,
        "required": REQUIRED_FIELDS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogs() -> Catalogs {
        Catalogs::builtin().expect("builtin catalogs")
    }

    #[test]
    fn test_new_effect_contents() {
        let request = build_request(
            "blue sparks",
            None,
            &catalogs(),
            &TranslatorSettings::default(),
            false,
        );
        assert!(request.contents.contains("\"blue sparks\""));
        assert!(request.compact.is_none());
        assert_eq!(request.max_output_tokens, 8192);
        assert!(request.system_instruction.contains("TEXTURE LOGIC"));
    }

    #[test]
    fn test_modification_embeds_compact() {
        let compact = r#"{"name":"Base","textureID":"FLAME"}"#;
        let request = build_request(
            "make it green",
            Some(compact),
            &catalogs(),
            &TranslatorSettings::default(),
            false,
        );
        assert!(request.contents.contains(compact));
        assert!(request.contents.contains("make it green"));
        assert_eq!(request.compact.as_deref(), Some(compact));
    }

    #[test]
    fn test_forced_shape_instruction() {
        let request = build_request(
            "lightning",
            None,
            &catalogs(),
            &TranslatorSettings::default(),
            true,
        );
        assert!(request.system_instruction.contains("CRITICAL SHAPE INSTRUCTION"));
        assert!(!request.system_instruction.contains("TEXTURE LOGIC"));
    }

    #[test]
    fn test_instruction_lists_catalogs() {
        let instruction = system_instruction("x", &catalogs(), false);
        assert!(instruction.contains("FLAME"));
        assert!(instruction.contains("'Perlin Cloud'"));
        assert!(instruction.contains("DO NOT OUTPUT 'textureUrl'"));
    }

    #[test]
    fn test_schema_enumerations() {
        let schema = response_schema(&catalogs());
        let shapes = schema["properties"]["textureID"]["enum"]
            .as_array()
            .expect("shape enum");
        assert!(shapes.iter().any(|v| v == "GENERATED"));
        assert!(shapes.iter().any(|v| v == "CUSTOM"));
        assert!(shapes.iter().any(|v| v == "SKULL"));
        let noise = schema["properties"]["noiseTextureID"]["enum"]
            .as_array()
            .expect("noise enum");
        assert_eq!(noise.len(), 3);
        assert!(schema["properties"].get("textureUrl").is_none());
        assert!(schema["properties"].get("customSVG").is_some());
    }
}
