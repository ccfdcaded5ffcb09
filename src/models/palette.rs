use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXPECTED_PALETTES: usize = 3;
pub const MIN_COLORS: usize = 2;
pub const MAX_COLORS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    #[serde(default)]
    pub hex: String,
    #[serde(default)]
    pub name: String,
}

impl Color {
    pub fn new(hex: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            name: name.into(),
        }
    }

    /// Text color that stays legible on top of this swatch.
    pub fn text_color(&self) -> &'static str {
        crate::contrast::contrast_color(&self.hex)
    }
}

/// A named, described group of colors. Fields the provider leaves out decode
/// as empty so an incomplete palette still reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub colors: Vec<Color>,
}

impl Palette {
    pub fn leading_color(&self) -> Option<&Color> {
        self.colors.first()
    }

    pub fn starts_with(&self, base_hex: &str) -> bool {
        self.leading_color()
            .map_or(false, |c| c.hex.eq_ignore_ascii_case(base_hex))
    }
}

/// Deviation from the shape the response schema asks for. These are reported,
/// never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeIssue {
    PaletteCount(usize),
    ColorCount { palette: usize, count: usize },
    BaseColorMismatch { palette: usize, found: Option<String> },
}

impl fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeIssue::PaletteCount(n) => {
                write!(f, "expected {} palettes, got {}", EXPECTED_PALETTES, n)
            }
            ShapeIssue::ColorCount { palette, count } => write!(
                f,
                "palette {} has {} colors (expected {}-{})",
                palette, count, MIN_COLORS, MAX_COLORS
            ),
            ShapeIssue::BaseColorMismatch { palette, found } => write!(
                f,
                "palette {} does not lead with the base color (found {})",
                palette,
                found.as_deref().unwrap_or("nothing")
            ),
        }
    }
}

pub fn shape_issues(palettes: &[Palette], base_hex: Option<&str>) -> Vec<ShapeIssue> {
    let mut issues = Vec::new();
    if palettes.len() != EXPECTED_PALETTES {
        issues.push(ShapeIssue::PaletteCount(palettes.len()));
    }

    for (index, palette) in palettes.iter().enumerate() {
        let count = palette.colors.len();
        if !(MIN_COLORS..=MAX_COLORS).contains(&count) {
            issues.push(ShapeIssue::ColorCount {
                palette: index,
                count,
            });
        }
        if let Some(base) = base_hex {
            if !palette.starts_with(base) {
                issues.push(ShapeIssue::BaseColorMismatch {
                    palette: index,
                    found: palette.leading_color().map(|c| c.hex.clone()),
                });
            }
        }
    }

    issues
}
