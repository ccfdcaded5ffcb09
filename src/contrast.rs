//! Text color selection for color chips.

pub const DARK_TEXT: &str = "#000000";
pub const LIGHT_TEXT: &str = "#FFFFFF";

/// YIQ brightness at or above which a swatch counts as light.
pub const YIQ_THRESHOLD: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    /// Dark text, for light swatches.
    Dark,
    /// Light text, for dark swatches.
    Light,
}

impl TextTone {
    pub fn hex(&self) -> &'static str {
        match self {
            TextTone::Dark => DARK_TEXT,
            TextTone::Light => LIGHT_TEXT,
        }
    }
}

fn parse_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn yiq(r: u8, g: u8, b: u8) -> f64 {
    (r as f64 * 299.0 + g as f64 * 587.0 + b as f64 * 114.0) / 1000.0
}

/// Anything that is not a `#RRGGBB` string gets dark text.
pub fn text_tone(hex: &str) -> TextTone {
    match parse_rgb(hex) {
        Some((r, g, b)) if yiq(r, g, b) < YIQ_THRESHOLD => TextTone::Light,
        _ => TextTone::Dark,
    }
}

pub fn contrast_color(hex: &str) -> &'static str {
    text_tone(hex).hex()
}
