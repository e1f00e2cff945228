use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::constants::SVG_DATA_URI_PREFIX;
use crate::error::ResourceError;

/// Soft radial glow, white on transparent. The default particle shape.
pub const FLARE_SVG: &str = "<svg xmlns='http://www.w3.org/2000/svg' width='64' height='64' viewBox='0 0 64 64'><defs><radialGradient id='g'><stop offset='0' stop-color='white' stop-opacity='1'/><stop offset='1' stop-color='white' stop-opacity='0'/></radialGradient></defs><circle cx='32' cy='32' r='32' fill='url(#g)'/></svg>";

/// Wrap SVG markup into a self-contained `data:` resource reference.
pub fn svg_data_uri(svg: &str) -> String {
    format!("{}{}", SVG_DATA_URI_PREFIX, BASE64.encode(svg.as_bytes()))
}

/// Reference used whenever a shape cannot be resolved.
pub fn default_texture_url() -> String {
    svg_data_uri(FLARE_SVG)
}

/// Validate a generated SVG payload and encode it as an inline reference.
pub fn encode_inline_svg(svg: &str, max_bytes: usize) -> Result<String, ResourceError> {
    let svg = svg.trim();
    if svg.is_empty() {
        return Err(ResourceError::Empty);
    }
    if svg.len() > max_bytes {
        return Err(ResourceError::TooLarge {
            len: svg.len(),
            max: max_bytes,
        });
    }
    if !svg.to_ascii_lowercase().contains("<svg") {
        return Err(ResourceError::NotSvg);
    }
    Ok(svg_data_uri(svg))
}

/// Decode the markup back out of an inline SVG reference.
pub fn decode_svg_data_uri(reference: &str) -> Option<String> {
    let encoded = reference.strip_prefix(SVG_DATA_URI_PREFIX)?;
    let bytes = BASE64.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}
