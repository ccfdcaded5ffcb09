//! Caller-side access to the palette proxy.

use crate::{
    error::{PaletteError, Rejection, Result},
    gemini::parse_palettes,
    models::{ErrorBody, Palette, PaletteRequest},
    validation::validate,
};
use reqwest::{Client, StatusCode};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

pub const GENERATE_PATH: &str = "/api/generate";

/// Allows one outstanding request at a time. A second caller is turned away,
/// not queued.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    busy: Arc<AtomicBool>,
}

/// Holds the gate until dropped.
#[derive(Debug)]
pub struct GateGuard {
    busy: Arc<AtomicBool>,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<GateGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PaletteError::Busy)?;
        Ok(GateGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct PaletteClient {
    http: Client,
    endpoint: String,
    gate: SubmissionGate,
}

impl PaletteClient {
    /// `base_url` is the proxy origin, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH),
            gate: SubmissionGate::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Validates locally, then posts to the proxy. Invalid input never reaches
    /// the network; a call made while another is pending fails with `Busy`.
    pub async fn request_palettes(&self, request: PaletteRequest) -> Result<Vec<Palette>> {
        let validated = validate(request)?;
        let _guard = self.gate.try_acquire()?;

        let body = PaletteRequest::from(validated);
        log::debug!("Posting {} request to {}", body.mode(), self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| PaletteError::Transport(format!("Proxy request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await?;
        decode_proxy_response(status, &text)
    }
}

/// Maps a proxy reply to palettes or the matching error. Only 400 and 413
/// carry a message meant for the user; any other failure is a transport
/// problem.
pub fn decode_proxy_response(status: StatusCode, body: &str) -> Result<Vec<Palette>> {
    if status.is_success() {
        return parse_palettes(body);
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));

    match status {
        StatusCode::TOO_MANY_REQUESTS => Err(PaletteError::Busy),
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => {
            Err(Rejection::Remote(message).into())
        }
        _ => {
            log::error!("Proxy returned {}: {}", status, message);
            Err(PaletteError::Transport(format!("{}: {}", status, message)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayLanguage;

    #[test]
    fn test_gate_is_single_flight() {
        let gate = SubmissionGate::new();
        let guard = gate.try_acquire().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(gate.try_acquire(), Err(PaletteError::Busy)));

        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }

    #[test]
    fn test_clones_share_the_gate() {
        let client = PaletteClient::new("http://localhost:8080/");
        let other = client.clone();
        let _guard = client.gate.try_acquire().unwrap();
        assert!(other.is_busy());
        assert_eq!(other.endpoint(), "http://localhost:8080/api/generate");
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_network() {
        // Port 9 is unreachable; a validation error proves no request was sent.
        let client = PaletteClient::new("http://127.0.0.1:9");
        let err = client
            .request_palettes(PaletteRequest::color("blue"))
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!client.is_busy());
    }

    #[tokio::test]
    async fn test_busy_client_rejects_second_request() {
        let client = PaletteClient::new("http://127.0.0.1:9");
        let _guard = client.gate.try_acquire().unwrap();
        let err = client
            .request_palettes(PaletteRequest::color("#87CEEB"))
            .await
            .unwrap_err();
        assert!(matches!(err, PaletteError::Busy));
    }

    #[test]
    fn test_decode_success() {
        let palettes = decode_proxy_response(
            StatusCode::OK,
            r##"[{"name":"A","description":"d","colors":[{"hex":"#87CEEB","name":"Sky"}]}]"##,
        )
        .unwrap();
        assert_eq!(palettes.len(), 1);
        assert_eq!(palettes[0].colors[0].name, "Sky");
    }

    #[test]
    fn test_decode_client_error_is_verbatim() {
        let err = decode_proxy_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Image data is required."}"#,
        )
        .unwrap_err();
        assert_eq!(
            err.user_message(DisplayLanguage::English),
            "Image data is required."
        );

        let err = decode_proxy_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            r#"{"error":"El archivo es muy grande."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PaletteError::Validation(Rejection::Remote(_))));
    }

    #[test]
    fn test_decode_other_client_errors_are_transport() {
        for status in [StatusCode::NOT_FOUND, StatusCode::METHOD_NOT_ALLOWED] {
            let err = decode_proxy_response(status, r#"{"error":"Method Not Allowed"}"#)
                .unwrap_err();
            assert!(
                matches!(err, PaletteError::Transport(_)),
                "{} should be a transport error",
                status
            );
        }
    }

    #[test]
    fn test_decode_server_error() {
        let err = decode_proxy_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>")
            .unwrap_err();
        match err {
            PaletteError::Transport(msg) => {
                assert_eq!(msg, "500 Internal Server Error: Request failed with status 500")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_busy() {
        let err =
            decode_proxy_response(StatusCode::TOO_MANY_REQUESTS, r#"{"error":"busy"}"#).unwrap_err();
        assert!(matches!(err, PaletteError::Busy));
    }

    #[cfg(feature = "server")]
    mod live {
        use super::*;
        use crate::{
            config::{Config, ProviderConfig},
            test_support::{spawn_fake_gemini, spawn_proxy, CannedReply, TEST_API_KEY, THREE_PALETTES},
        };
        use actix_web::web;

        fn proxy_backed_by(reply: CannedReply) -> PaletteClient {
            let gemini_url = spawn_fake_gemini(web::Data::new(reply));
            let config = Config::new().with_provider(
                ProviderConfig::new()
                    .with_api_key(TEST_API_KEY)
                    .with_base_url(gemini_url),
            );
            PaletteClient::new(&spawn_proxy(config))
        }

        #[actix_web::test]
        async fn test_request_palettes_end_to_end() {
            let client = proxy_backed_by(CannedReply::text(THREE_PALETTES));

            let palettes = client
                .request_palettes(PaletteRequest::color("#87ceeb"))
                .await
                .unwrap();
            assert_eq!(palettes.len(), 3);
            assert!(palettes.iter().all(|p| p.starts_with("#87CEEB")));
            assert!(!client.is_busy());
        }

        #[actix_web::test]
        async fn test_provider_failure_reaches_caller_as_transport_error() {
            let client = proxy_backed_by(CannedReply::new(503, r#"{"error":{"code":503}}"#));

            let err = client
                .request_palettes(PaletteRequest::color("#87CEEB"))
                .await
                .unwrap_err();
            match &err {
                PaletteError::Transport(msg) => assert!(msg.starts_with("500"), "{}", msg),
                other => panic!("unexpected error: {:?}", other),
            }
            assert!(err
                .user_message(DisplayLanguage::Spanish)
                .starts_with("No se pudieron generar"));
            assert!(!client.is_busy());
        }

        #[actix_web::test]
        async fn test_unconfigured_proxy_is_transport_error() {
            let client = PaletteClient::new(&spawn_proxy(
                Config::new().with_provider(ProviderConfig::new()),
            ));

            let err = client
                .request_palettes(PaletteRequest::color("#87CEEB"))
                .await
                .unwrap_err();
            assert!(matches!(err, PaletteError::Transport(_)));
        }

        #[actix_web::test]
        async fn test_proxy_rejection_message_is_relayed() {
            // Skips local validation so the proxy does the rejecting.
            let client = proxy_backed_by(CannedReply::text(THREE_PALETTES));
            let response = client
                .http
                .post(client.endpoint())
                .json(&serde_json::json!({"type": "image", "image": {"base64Data": "", "mimeType": "image/png"}}))
                .send()
                .await
                .unwrap();
            let status = response.status();
            let err = decode_proxy_response(status, &response.text().await.unwrap()).unwrap_err();

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                err.user_message(DisplayLanguage::English),
                "Se requieren los datos de la imagen."
            );
        }
    }
}
