//! Paint palette recommendations from a base color or an inspiration image.
//!
//! Input is validated locally ([`validation`]), sent once to Gemini with a
//! strict response schema ([`gemini`]) and decoded into [`Palette`] records.
//! The optional [`server`] module exposes the same pipeline over HTTP so the
//! provider key stays off the client, and [`client`] talks to it.

pub mod client;
pub mod config;
pub mod contrast;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
#[cfg(all(test, feature = "server"))]
mod test_support;
pub mod validation;

pub use client::{PaletteClient, SubmissionGate};
pub use config::{Config, DisplayLanguage, ProviderConfig};
pub use contrast::{contrast_color, TextTone};
pub use error::{PaletteError, Rejection, Result};
pub use gemini::{parse_palettes, GeminiProvider, PaletteProvider, PaletteService, Prompt};
pub use models::{Color, ErrorBody, ImageInput, Palette, PaletteRequest};
pub use validation::{validate, validate_hex, HexColor, ValidatedRequest};
