use crate::scene::Color;

/// Convert a normalized-channel color to a CSS hex string
///
/// Channels are expected in the 0.0-1.0 range; each is clamped, scaled to
/// 0-255 and rounded to the nearest integer (half rounds up). Alpha is never
/// encoded. Absent input yields an absent result.
///
/// # Examples
/// ```
/// use scene2fabric::color::to_hex;
/// use scene2fabric::scene::Color;
///
/// let color = Color { r: 1.0, g: 0.5, b: 0.0, a: None };
/// assert_eq!(to_hex(Some(&color)), Some("#ff8000".to_string()));
/// assert_eq!(to_hex(None), None);
/// ```
pub fn to_hex(color: Option<&Color>) -> Option<String> {
    let color = color?;
    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channel_to_byte(color.r),
        channel_to_byte(color.g),
        channel_to_byte(color.b)
    ))
}

/// Convert a normalized-channel color to a CSS `rgba(...)` string
///
/// Same channel rounding as [`to_hex`]; alpha defaults to 1 when absent and
/// is passed through unscaled.
///
/// # Examples
/// ```
/// use scene2fabric::color::to_rgba_string;
/// use scene2fabric::scene::Color;
///
/// let color = Color { r: 0.0, g: 0.0, b: 1.0, a: Some(0.5) };
/// assert_eq!(to_rgba_string(&color), "rgba(0, 0, 255, 0.5)");
/// ```
pub fn to_rgba_string(color: &Color) -> String {
    let a = color.a.unwrap_or(1.0);
    format!(
        "rgba({}, {}, {}, {})",
        channel_to_byte(color.r),
        channel_to_byte(color.g),
        channel_to_byte(color.b),
        a
    )
}

/// Resolve a hex color against a paint opacity
///
/// When `opacity` is below 1 the hex string is decoded back to integer
/// channels and re-emitted as `rgba(R, G, B, opacity)`. When `opacity` is 1
/// the hex string is returned unchanged, so no rounding drift is introduced
/// for the common opaque case. A hex string that does not decode (wrong
/// length, non-hex digits) is also returned unchanged.
pub fn resolve_for_opacity(hex: &str, opacity: f64) -> String {
    if opacity >= 1.0 {
        return hex.to_string();
    }
    match decode_hex(hex) {
        Some((r, g, b)) => format!("rgba({}, {}, {}, {})", r, g, b, opacity),
        None => hex.to_string(),
    }
}

/// Convert a float in range 0.0-1.0 to a byte in range 0-255
///
/// Clamps the input to [0.0, 1.0] and rounds to the nearest integer.
fn channel_to_byte(value: f64) -> u8 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 255.0).round() as u8
}

/// Decode a `#rrggbb` string back to integer channels
fn decode_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
