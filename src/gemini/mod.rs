pub mod client;
pub mod prompt;
pub mod traits;

use crate::{
    config::{Config, DisplayLanguage},
    error::{PaletteError, Result},
    logger,
    models::{shape_issues, Palette},
    validation::ValidatedRequest,
};
use serde_json::Value;
use std::sync::Arc;

pub use client::GeminiProvider;
pub use prompt::{response_schema, Prompt};
pub use traits::PaletteProvider;

/// Turns a validated request into palettes with a single provider call.
#[derive(Clone)]
pub struct PaletteService {
    provider: Arc<dyn PaletteProvider>,
    language: DisplayLanguage,
}

impl PaletteService {
    pub fn new(provider: Arc<dyn PaletteProvider>, language: DisplayLanguage) -> Self {
        Self { provider, language }
    }

    /// Builds a Gemini-backed service. Fails with a configuration error when
    /// no API key is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = GeminiProvider::new(config.provider.clone())?;
        Ok(Self::new(Arc::new(provider), config.language))
    }

    pub async fn generate(&self, request: ValidatedRequest) -> Result<Vec<Palette>> {
        let base = request.base_color().map(|hex| hex.as_str().to_string());
        let mode = request.mode();
        let prompt = Prompt::build(request, self.language);

        let raw = {
            let _timer = logger::timer(&format!("{} generation ({})", mode, self.provider.model()));
            self.provider.complete(&prompt).await?
        };

        let palettes = parse_palettes(&raw)?;
        for issue in shape_issues(&palettes, base.as_deref()) {
            log::warn!("Palette response deviates from schema: {}", issue);
        }
        log::info!("Generated {} palettes from {} input", palettes.len(), mode);

        Ok(palettes)
    }
}

/// Decodes raw provider text: trimmed, non-empty, JSON, an array.
pub fn parse_palettes(raw: &str) -> Result<Vec<Palette>> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(PaletteError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(text).map_err(|e| {
        log::error!("Failed to parse JSON from provider response. Raw text: {}", text);
        PaletteError::MalformedResponse(e.to_string())
    })?;

    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(|e| {
            log::error!("Provider array did not hold palette objects. Raw text: {}", text);
            PaletteError::UnexpectedShape(e.to_string())
        }),
        other => Err(PaletteError::UnexpectedShape(format!(
            "expected an array of palettes, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
