//! Input normalization and validation. Nothing in here touches the network.

use crate::{
    error::{Rejection, Result},
    models::{ImageInput, PaletteRequest},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fmt, fs, path::Path};

pub const MAX_IMAGE_MB: usize = 5;
pub const MAX_IMAGE_BYTES: usize = MAX_IMAGE_MB * 1024 * 1024;

/// MIME types accepted at selection time, with the extensions that map to them.
pub const ACCEPTED_IMAGE_TYPES: &[(&str, &[&str])] = &[
    ("image/jpeg", &["jpeg", "jpg"]),
    ("image/png", &["png"]),
    ("image/webp", &["webp"]),
];

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("hex color pattern is valid"));

/// A `#RRGGBB` color that passed validation. Stored uppercase, compared
/// without regard to case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(input: &str) -> Result<Self> {
        if !HEX_COLOR.is_match(input) {
            return Err(Rejection::InvalidHex.into());
        }
        Ok(HexColor(input.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request that is safe to hand to the palette service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedRequest {
    Color(HexColor),
    Image(ImageInput),
}

impl ValidatedRequest {
    pub fn base_color(&self) -> Option<&HexColor> {
        match self {
            ValidatedRequest::Color(hex) => Some(hex),
            ValidatedRequest::Image(_) => None,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            ValidatedRequest::Color(_) => "color",
            ValidatedRequest::Image(_) => "image",
        }
    }
}

impl From<ValidatedRequest> for PaletteRequest {
    fn from(request: ValidatedRequest) -> Self {
        match request {
            ValidatedRequest::Color(hex) => PaletteRequest::color(hex.0),
            ValidatedRequest::Image(image) => PaletteRequest::image(image),
        }
    }
}

pub fn validate_hex(input: &str) -> Result<HexColor> {
    HexColor::parse(input)
}

pub fn validate(request: PaletteRequest) -> Result<ValidatedRequest> {
    match request {
        PaletteRequest::Color { color } => validate_hex(&color).map(ValidatedRequest::Color),
        PaletteRequest::Image { image } => {
            let image = image
                .filter(|i| !i.base64_data.trim().is_empty() && !i.mime_type.trim().is_empty())
                .ok_or(Rejection::MissingImage)?;
            check_image_type(&image.mime_type)?;
            let bytes = STANDARD
                .decode(image.base64_data.trim())
                .map_err(|_| Rejection::InvalidBase64)?;
            check_image_size(bytes.len())?;
            Ok(ValidatedRequest::Image(image))
        }
    }
}

pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_ascii_lowercase();
    ACCEPTED_IMAGE_TYPES
        .iter()
        .find(|(_, exts)| exts.contains(&extension.as_str()))
        .map(|(mime, _)| *mime)
}

fn check_image_type(mime_type: &str) -> Result<()> {
    let normalized = mime_type.trim().to_ascii_lowercase();
    if ACCEPTED_IMAGE_TYPES.iter().any(|(mime, _)| *mime == normalized) {
        Ok(())
    } else {
        Err(Rejection::UnsupportedType(mime_type.to_string()).into())
    }
}

fn check_image_size(len: usize) -> Result<()> {
    if len > MAX_IMAGE_BYTES {
        return Err(Rejection::TooLarge.into());
    }
    if len == 0 {
        return Err(Rejection::EmptyImage.into());
    }
    Ok(())
}

impl ImageInput {
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Result<Self> {
        check_image_type(mime_type)?;
        check_image_size(bytes.len())?;
        Ok(Self {
            base64_data: STANDARD.encode(bytes),
            mime_type: mime_type.trim().to_ascii_lowercase(),
        })
    }

    /// Reads an image file, inferring its MIME type from the extension. The
    /// size ceiling is checked against file metadata before reading.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(mime_for_extension)
            .ok_or_else(|| Rejection::UnsupportedType(path.display().to_string()))?;

        let unreadable = |e: std::io::Error| Rejection::UnreadableFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let metadata = fs::metadata(path).map_err(unreadable)?;
        check_image_size(metadata.len() as usize)?;

        let bytes = fs::read(path).map_err(unreadable)?;
        Self::from_bytes(&bytes, mime_type)
    }

    /// Splits a `data:<mime>;base64,<payload>` URL into its parts.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or(Rejection::UnreadableImage)?;
        let (header, payload) = rest.split_once(',').ok_or(Rejection::UnreadableImage)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(Rejection::UnreadableImage)?;

        let image = ImageInput {
            base64_data: payload.to_string(),
            mime_type: mime_type.to_ascii_lowercase(),
        };
        match validate(PaletteRequest::image(image))? {
            ValidatedRequest::Image(image) => Ok(image),
            ValidatedRequest::Color(_) => Err(Rejection::UnreadableImage.into()),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn looks_like_hex(input: &str) -> bool {
        let bytes = input.as_bytes();
        bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(u8::is_ascii_hexdigit)
    }

    proptest! {
        #[test]
        fn generated_hex_colors_validate(input in "#[0-9A-Fa-f]{6}") {
            let hex = validate_hex(&input).unwrap();
            prop_assert_eq!(hex.as_str(), input.to_ascii_uppercase());
            prop_assert!(hex.matches(&input));
        }

        #[test]
        fn arbitrary_strings_validate_only_when_hex(input in ".*") {
            prop_assert_eq!(validate_hex(&input).is_ok(), looks_like_hex(&input));
        }

        #[test]
        fn near_miss_strings_validate_only_when_hex(input in "#?[0-9A-Za-z #]{0,8}") {
            prop_assert_eq!(validate_hex(&input).is_ok(), looks_like_hex(&input));
        }

        #[test]
        fn surrounding_whitespace_is_rejected(input in "#[0-9A-F]{6}", pad in "[ \\t\\n]{1,3}") {
            let leading = format!("{}{}", pad, input);
            let trailing = format!("{}{}", input, pad);
            prop_assert!(validate_hex(&leading).is_err());
            prop_assert!(validate_hex(&trailing).is_err());
        }
    }
}
