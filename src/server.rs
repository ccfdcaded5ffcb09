//! HTTP proxy that keeps the provider credential server-side.

use crate::{
    client::GENERATE_PATH,
    config::Config,
    error::{PaletteError, Rejection, Result},
    gemini::PaletteService,
    models::{ErrorBody, HealthStatus, PaletteRequest},
    validation::{validate, MAX_IMAGE_BYTES},
};
use actix_web::{web, App, HttpResponse, HttpServer};
use futures::StreamExt;
use serde_json::Value;
use uuid::Uuid;

/// Room for a maximum-size image after base64 plus the JSON envelope.
pub const MAX_BODY_BYTES: usize = MAX_IMAGE_BYTES / 3 * 4 + 64 * 1024;

pub struct AppState {
    config: Config,
    service: Option<PaletteService>,
}

impl AppState {
    /// A missing provider key is logged and reported per request, not fatal.
    pub fn from_config(config: Config) -> Self {
        let service = match PaletteService::from_config(&config) {
            Ok(service) => Some(service),
            Err(e) => {
                log::warn!("Palette service unavailable: {}", e);
                None
            }
        };
        Self { config, service }
    }

    pub fn with_service(config: Config, service: PaletteService) -> Self {
        Self {
            config,
            service: Some(service),
        }
    }

    fn service(&self) -> Result<&PaletteService> {
        self.service.as_ref().ok_or_else(|| {
            PaletteError::Configuration("Provider API key is not configured on the server".into())
        })
    }
}

/// Collects the request body, stopping as soon as it passes `limit`.
async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk
            .map_err(|e| PaletteError::Transport(format!("Could not read request body: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(Rejection::TooLarge.into());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn parse_request(body: &[u8]) -> Result<PaletteRequest> {
    let value: Value = serde_json::from_slice(body).map_err(|_| Rejection::InvalidBody)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(Rejection::InvalidRequestType)?;

    match kind {
        "color" => serde_json::from_value(value).map_err(|_| Rejection::InvalidHex.into()),
        "image" => serde_json::from_value(value).map_err(|_| Rejection::MissingImage.into()),
        _ => Err(Rejection::InvalidRequestType.into()),
    }
}

async fn generate(state: web::Data<AppState>, payload: web::Payload) -> HttpResponse {
    let request_id = Uuid::new_v4();

    let outcome = async {
        let service = state.service()?;
        let body = read_body(payload, MAX_BODY_BYTES).await?;
        let request = validate(parse_request(&body)?)?;
        log::info!("[req:{}] Generating palettes from {} input", request_id, request.mode());
        service.generate(request).await
    }
    .await;

    match outcome {
        Ok(palettes) => HttpResponse::Ok().json(palettes),
        Err(e) => {
            if e.is_validation() {
                log::warn!("[req:{}] Rejected request: {}", request_id, e);
            } else {
                log::error!("[req:{}] Generation failed: {:?}", request_id, e);
            }
            e.to_response(state.config.language)
        }
    }
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed().json(ErrorBody::new("Method Not Allowed"))
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        model: state.config.provider.model.clone(),
        provider_configured: state.service.is_some(),
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
            web::resource(GENERATE_PATH)
                .route(web::post().to(generate))
                .default_service(web::route().to(method_not_allowed)),
        )
        .route("/api/health", web::get().to(health));
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let address = config.bind_address();
    let state = web::Data::new(AppState::from_config(config));

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(address)?
        .run()
        .await
}
