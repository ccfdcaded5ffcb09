use crate::{
    config::ProviderConfig,
    error::{PaletteError, Result},
    gemini::{prompt::Prompt, traits::PaletteProvider},
    models::gemini::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part},
};
use async_trait::async_trait;
use reqwest::Client;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_key = config.api_key.ok_or_else(|| {
            PaletteError::Configuration("Provider API key is not configured on the server".into())
        })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// The image part goes before the text part.
    pub fn build_request(prompt: &Prompt) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = &prompt.image {
            parts.push(Part::inline(&image.mime_type, &image.base64_data));
        }
        parts.push(Part::text(&prompt.text));

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: prompt.schema.clone(),
            },
        }
    }
}

#[async_trait]
impl PaletteProvider for GeminiProvider {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let payload = Self::build_request(prompt);

        log::info!("Invoking model: {}", self.model);
        log::debug!(
            "Generation request: prompt {} chars, image attached: {}",
            prompt.text.len(),
            prompt.image.is_some()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {:?}", e);
                PaletteError::Transport(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Gemini returned {}: {}", status, error_text);
            return Err(PaletteError::Transport(format!(
                "Gemini returned {}",
                status
            )));
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            log::error!("Could not decode Gemini response envelope: {}", e);
            PaletteError::Transport(format!("Invalid Gemini response envelope: {}", e))
        })?;

        if let Some(reason) = body.finish_reason() {
            log::debug!("Finish reason: {}", reason);
        }

        Ok(body.text())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
