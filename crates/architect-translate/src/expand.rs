use architect_core::resource::{default_texture_url, encode_inline_svg};
use architect_core::{merge_fields, ParticleConfig};
use serde_json::{Map, Value};

use crate::catalog::{Catalogs, CUSTOM_SYMBOL, DEFAULT_SHAPE_SYMBOL, GENERATED_SYMBOL};
use crate::compress::{Compressed, COMPACT_ONLY_FIELDS, RESOURCE_FIELDS};
use crate::settings::TranslatorSettings;

/// What the expander knows about the request the response answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandContext<'a> {
    /// Config the response modifies. Fields the response omits keep its values.
    pub base: Option<&'a ParticleConfig>,
    /// Compression record of `base`.
    pub compressed: Option<&'a Compressed>,
    /// Shape reference restored for `CUSTOM`.
    pub prior_shape_ref: Option<&'a str>,
    /// Noise reference restored for `CUSTOM`.
    pub prior_noise_ref: Option<&'a str>,
}

impl<'a> ExpandContext<'a> {
    pub fn from_compressed(base: &'a ParticleConfig, compressed: &'a Compressed) -> Self {
        Self {
            base: Some(base),
            compressed: Some(compressed),
            prior_shape_ref: Some(compressed.original_shape_ref.as_str()),
            prior_noise_ref: compressed.original_noise_ref.as_deref(),
        }
    }
}

/// Turn a decoded compact object back into a full config.
///
/// Never fails: unresolvable symbols and ill-typed fields degrade to fallback
/// values.
pub fn expand(
    decoded: &Map<String, Value>,
    ctx: &ExpandContext<'_>,
    catalogs: &Catalogs,
    settings: &TranslatorSettings,
) -> ParticleConfig {
    let shape_symbol = text_field(decoded, "textureID").unwrap_or(DEFAULT_SHAPE_SYMBOL);
    let noise_symbol = text_field(decoded, "noiseTextureID");
    let inline_svg = text_field(decoded, "customSVG");

    let mut fields = decoded.clone();
    for key in COMPACT_ONLY_FIELDS.iter().chain(RESOURCE_FIELDS) {
        fields.remove(*key);
    }

    let default_template;
    let template = match ctx.base {
        Some(base) => base,
        None => {
            default_template = ParticleConfig::default();
            &default_template
        }
    };
    let (mut config, rejected) = merge_fields(template, &fields);
    if !rejected.is_empty() {
        log::warn!("Ignored ill-typed fields in response: {}", rejected.join(", "));
    }

    config.texture_url = resolve_shape(shape_symbol, inline_svg, ctx, catalogs, settings);
    config.noise_texture_url = resolve_noise(noise_symbol, ctx, catalogs);
    enforce_visibility(&mut config, settings.visibility_epsilon);
    config
}

fn text_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

/// Shape resolution, first match wins:
/// 1. `GENERATED` with a payload: the encoded payload (default shape if it is invalid)
/// 2. a cataloged symbol: its reference
/// 3. `CUSTOM` or the symbol recorded at compression: the prior reference
/// 4. anything else: the default shape
fn resolve_shape(
    symbol: &str,
    inline_svg: Option<&str>,
    ctx: &ExpandContext<'_>,
    catalogs: &Catalogs,
    settings: &TranslatorSettings,
) -> String {
    let symbol = symbol.trim().to_ascii_uppercase();

    if symbol == GENERATED_SYMBOL {
        if let Some(svg) = inline_svg.filter(|svg| !svg.trim().is_empty()) {
            return match encode_inline_svg(svg, settings.max_inline_svg_bytes) {
                Ok(reference) => reference,
                Err(e) => {
                    log::error!("Failed to encode generated shape: {e}");
                    default_texture_url()
                }
            };
        }
    }

    if let Some(reference) = catalogs.shapes.reference(&symbol) {
        return reference.to_string();
    }

    let recorded = ctx.compressed.map(|c| c.resolved_shape_symbol.as_str());
    if symbol == CUSTOM_SYMBOL || recorded == Some(symbol.as_str()) {
        if let Some(prior) = ctx.prior_shape_ref {
            return prior.to_string();
        }
    }

    log::warn!("Unresolvable shape symbol '{symbol}', using default shape");
    default_texture_url()
}

/// Noise resolution mirrors shapes, without the generated case. No symbol
/// means no turbulence.
fn resolve_noise(
    symbol: Option<&str>,
    ctx: &ExpandContext<'_>,
    catalogs: &Catalogs,
) -> Option<String> {
    let symbol = symbol.map(str::trim).filter(|s| !s.is_empty())?;
    if symbol.eq_ignore_ascii_case("none") {
        return None;
    }

    if let Some(reference) = catalogs.noise.reference(symbol) {
        return Some(reference.to_string());
    }

    let recorded = ctx
        .compressed
        .and_then(|c| c.resolved_noise_symbol.as_deref());
    if symbol.eq_ignore_ascii_case(CUSTOM_SYMBOL) || recorded == Some(symbol) {
        if let Some(prior) = ctx.prior_noise_ref {
            return Some(prior.to_string());
        }
    }

    log::warn!("Unresolvable noise symbol '{symbol}', disabling turbulence");
    None
}

/// Keep simple-color particles from being invisible for their whole life.
/// Returns whether the config was changed.
pub fn enforce_visibility(config: &mut ParticleConfig, epsilon: f32) -> bool {
    if config.uses_ramp() {
        return false;
    }
    if config.start_alpha <= epsilon && config.end_alpha <= epsilon {
        log::warn!(
            "Generated particles are invisible (start {}, end {}), enforcing visibility",
            config.start_alpha,
            config.end_alpha
        );
        config.start_alpha = 1.0;
        config.end_alpha = 0.0;
        return true;
    }
    false
}
