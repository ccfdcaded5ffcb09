use crate::{config::DisplayLanguage, validation::MAX_IMAGE_MB};
use std::fmt;
use thiserror::Error;

/// Why a request was turned away before reaching the provider. Each reason
/// renders in the configured display language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    InvalidHex,
    MissingImage,
    InvalidBase64,
    UnsupportedType(String),
    TooLarge,
    EmptyImage,
    UnreadableImage,
    UnreadableFile { path: String, reason: String },
    InvalidRequestType,
    InvalidBody,
    /// A message relayed from the proxy, shown as received.
    Remote(String),
}

impl Rejection {
    pub fn message(&self, language: DisplayLanguage) -> String {
        use DisplayLanguage::{English, Spanish};
        match (self, language) {
            (Rejection::InvalidHex, Spanish) => {
                "Se requiere un código de color hexadecimal válido (por ejemplo #87CEEB).".into()
            }
            (Rejection::InvalidHex, English) => {
                "A valid hexadecimal color code is required (for example #87CEEB).".into()
            }
            (Rejection::MissingImage, Spanish) => "Se requieren los datos de la imagen.".into(),
            (Rejection::MissingImage, English) => "Image data is required.".into(),
            (Rejection::InvalidBase64, Spanish) => {
                "Los datos de la imagen no son base64 válido.".into()
            }
            (Rejection::InvalidBase64, English) => "Image data is not valid base64.".into(),
            (Rejection::UnsupportedType(kind), Spanish) => format!(
                "Tipo de archivo no admitido '{}'. Usa una imagen JPEG, PNG o WEBP.",
                kind
            ),
            (Rejection::UnsupportedType(kind), English) => {
                format!("Unsupported file type '{}'. Use a JPEG, PNG or WEBP image.", kind)
            }
            (Rejection::TooLarge, Spanish) => format!(
                "El archivo es muy grande. El tamaño máximo es de {}MB.",
                MAX_IMAGE_MB
            ),
            (Rejection::TooLarge, English) => format!(
                "The file is too large. The maximum size is {}MB.",
                MAX_IMAGE_MB
            ),
            (Rejection::EmptyImage, Spanish) => "El archivo de imagen está vacío.".into(),
            (Rejection::EmptyImage, English) => "The image file is empty.".into(),
            (Rejection::UnreadableImage, Spanish) => "Error al leer el archivo.".into(),
            (Rejection::UnreadableImage, English) => "The image could not be read.".into(),
            (Rejection::UnreadableFile { path, reason }, Spanish) => {
                format!("No se pudo leer '{}': {}", path, reason)
            }
            (Rejection::UnreadableFile { path, reason }, English) => {
                format!("Could not read '{}': {}", path, reason)
            }
            (Rejection::InvalidRequestType, Spanish) => {
                "Se especificó un tipo de solicitud no válido.".into()
            }
            (Rejection::InvalidRequestType, English) => {
                "An invalid request type was specified.".into()
            }
            (Rejection::InvalidBody, Spanish) => {
                "El cuerpo de la solicitud debe ser JSON válido.".into()
            }
            (Rejection::InvalidBody, English) => "The request body must be valid JSON.".into(),
            (Rejection::Remote(message), _) => message.clone(),
        }
    }
}

/// Logs always read in English.
impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message(DisplayLanguage::English))
    }
}

#[derive(Debug, Error)]
pub enum PaletteError {
    /// Bad or missing user input.
    #[error("{0}")]
    Validation(Rejection),
    #[error("Provider returned an empty response")]
    EmptyResponse,
    #[error("Provider response was not valid JSON: {0}")]
    MalformedResponse(String),
    #[error("Provider response had an unexpected shape: {0}")]
    UnexpectedShape(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Request already in flight")]
    Busy,
}

impl PaletteError {
    /// Message safe to show an end user. Provider output and transport
    /// details never leave the server through this.
    pub fn user_message(&self, language: DisplayLanguage) -> String {
        match (self, language) {
            (PaletteError::Validation(rejection), _) => rejection.message(language),
            (PaletteError::Busy, DisplayLanguage::Spanish) => {
                "Ya hay una solicitud de paletas en curso.".into()
            }
            (PaletteError::Busy, DisplayLanguage::English) => {
                "A palette request is already in progress.".into()
            }
            (_, DisplayLanguage::Spanish) => {
                "No se pudieron generar las paletas de color en este momento. Inténtalo de nuevo en un momento.".into()
            }
            (_, DisplayLanguage::English) => {
                "Could not generate color palettes right now. Please try again in a moment.".into()
            }
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, PaletteError::Validation(_))
    }
}

impl From<Rejection> for PaletteError {
    fn from(rejection: Rejection) -> Self {
        PaletteError::Validation(rejection)
    }
}

impl From<reqwest::Error> for PaletteError {
    fn from(e: reqwest::Error) -> Self {
        PaletteError::Transport(e.to_string())
    }
}

#[cfg(feature = "server")]
impl PaletteError {
    pub fn to_response(&self, language: DisplayLanguage) -> actix_web::HttpResponse {
        use actix_web::ResponseError;
        actix_web::HttpResponse::build(self.status_code())
            .json(crate::models::ErrorBody::new(self.user_message(language)))
    }
}

#[cfg(feature = "server")]
impl actix_web::ResponseError for PaletteError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            PaletteError::Validation(_) => StatusCode::BAD_REQUEST,
            PaletteError::Busy => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        self.to_response(DisplayLanguage::default())
    }
}

pub type Result<T> = std::result::Result<T, PaletteError>;
