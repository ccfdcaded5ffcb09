use serde::{Deserialize, Serialize};

/// An image picked by the user, already base64 encoded for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    #[serde(default)]
    pub base64_data: String,
    #[serde(default)]
    pub mime_type: String,
}

/// Inbound request, as posted to `/api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaletteRequest {
    Color {
        #[serde(default)]
        color: String,
    },
    Image {
        #[serde(default)]
        image: Option<ImageInput>,
    },
}

impl PaletteRequest {
    pub fn color(hex: impl Into<String>) -> Self {
        PaletteRequest::Color { color: hex.into() }
    }

    pub fn image(image: ImageInput) -> Self {
        PaletteRequest::Image { image: Some(image) }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            PaletteRequest::Color { .. } => "color",
            PaletteRequest::Image { .. } => "image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_request_wire_format() {
        let json = serde_json::to_value(PaletteRequest::color("#87CEEB")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "color", "color": "#87CEEB"}));
    }

    #[test]
    fn test_image_request_wire_format() {
        let request: PaletteRequest = serde_json::from_str(
            r#"{"type":"image","image":{"base64Data":"AAAA","mimeType":"image/png"}}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            PaletteRequest::image(ImageInput {
                base64_data: "AAAA".into(),
                mime_type: "image/png".into(),
            })
        );
        assert_eq!(request.mode(), "image");
    }

    #[test]
    fn test_missing_payload_still_decodes() {
        let request: PaletteRequest = serde_json::from_str(r#"{"type":"image"}"#).unwrap();
        assert_eq!(request, PaletteRequest::Image { image: None });

        let request: PaletteRequest = serde_json::from_str(r#"{"type":"color"}"#).unwrap();
        assert_eq!(request, PaletteRequest::color(""));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(serde_json::from_str::<PaletteRequest>(r#"{"type":"sound"}"#).is_err());
    }
}
