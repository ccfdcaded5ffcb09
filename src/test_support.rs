//! Live HTTP doubles for tests: a stand-in for the Gemini endpoint and a
//! running proxy. Both bind an ephemeral local port.

use crate::{
    config::Config,
    server::{configure, AppState},
};
use actix_web::{http::StatusCode, web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::sync::Mutex;

pub const TEST_API_KEY: &str = "test-key";

pub const THREE_PALETTES: &str = r##"[
    {"name":"Coastal Dawn","description":"Calm.","colors":[{"hex":"#87CEEB","name":"Sky"},{"hex":"#F5F5DC","name":"Sand"}]},
    {"name":"Urban","description":"Crisp.","colors":[{"hex":"#87CEEB","name":"Sky"},{"hex":"#36454F","name":"Charcoal"}]},
    {"name":"Earthy","description":"Warm.","colors":[{"hex":"#87CEEB","name":"Sky"},{"hex":"#8B4513","name":"Saddle"}]}
]"##;

/// What the fake Gemini endpoint answers, plus the request bodies it saw.
pub struct CannedReply {
    status: u16,
    body: String,
    received: Mutex<Vec<Value>>,
}

impl CannedReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            received: Mutex::new(Vec::new()),
        }
    }

    /// A successful `generateContent` envelope carrying `text` as the only part.
    pub fn text(text: &str) -> Self {
        let envelope = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        });
        Self::new(200, envelope.to_string())
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

async fn generate_content(
    req: HttpRequest,
    body: web::Json<Value>,
    reply: web::Data<CannedReply>,
) -> HttpResponse {
    let call = req.match_info().get("call").unwrap_or_default();
    if !call.ends_with(":generateContent") {
        return HttpResponse::NotFound().finish();
    }

    let key = req
        .headers()
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok());
    if key != Some(TEST_API_KEY) {
        return HttpResponse::Forbidden()
            .json(json!({"error": {"code": 403, "message": "API key not valid."}}));
    }

    if let Ok(mut received) = reply.received.lock() {
        received.push(body.into_inner());
    }
    HttpResponse::build(StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        .content_type("application/json")
        .body(reply.body.clone())
}

/// Starts a fake Gemini API and returns its base URL (ending in `/v1beta`).
pub fn spawn_fake_gemini(reply: web::Data<CannedReply>) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(reply.clone())
            .route("/v1beta/models/{call}", web::post().to(generate_content))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind fake gemini");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}/v1beta", addr)
}

/// Starts the palette proxy for `config` and returns its origin.
pub fn spawn_proxy(config: Config) -> String {
    let state = web::Data::new(AppState::from_config(config));
    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind proxy");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}
