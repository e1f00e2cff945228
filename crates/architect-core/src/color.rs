use glam::{Vec3, Vec4};

use crate::error::ColorError;

/// Parse `#RGB` or `#RRGGBB` (the `#` is optional) into linear 0.0–1.0 channels.
pub fn parse_hex_color(hex: &str) -> Result<Vec3, ColorError> {
    let digits = hex.trim().trim_start_matches('#');
    let invalid = || ColorError::InvalidHex(hex.to_string());

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let (r, g, b) = match digits.len() {
        3 => {
            let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
            (expand(0)?, expand(1)?, expand(2)?)
        }
        6 => (
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ),
        _ => return Err(invalid()),
    };

    Ok(Vec3::new(r as f32, g as f32, b as f32) / 255.0)
}

/// Parse a hex color and attach an alpha channel.
pub fn parse_hex_rgba(hex: &str, alpha: f32) -> Result<Vec4, ColorError> {
    Ok(parse_hex_color(hex)?.extend(alpha.clamp(0.0, 1.0)))
}

/// Two upper-case hex digits for an opacity, as appended to `#RRGGBB` colors
/// by the runtime format.
pub fn hex_alpha(alpha: f32) -> String {
    let a = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    format!("{:02X}", (a * 255.0).floor() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        let c = parse_hex_color("#ffaa00").expect("should parse");
        assert_eq!(c, Vec3::new(1.0, 170.0 / 255.0, 0.0));
    }

    #[test]
    fn test_parse_short_form_and_no_hash() {
        let c = parse_hex_color("f0a").expect("should parse");
        assert_eq!(c, Vec3::new(1.0, 0.0, 170.0 / 255.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("orange").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }

    #[test]
    fn test_rgba_clamps_alpha() {
        let c = parse_hex_rgba("#000000", 3.0).expect("should parse");
        assert_eq!(c.w, 1.0);
    }

    #[test]
    fn test_hex_alpha() {
        assert_eq!(hex_alpha(1.0), "FF");
        assert_eq!(hex_alpha(0.0), "00");
        assert_eq!(hex_alpha(0.5), "7F");
        assert_eq!(hex_alpha(-1.0), "00");
        assert_eq!(hex_alpha(2.0), "FF");
    }
}
