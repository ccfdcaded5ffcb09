use crate::{
    config::DisplayLanguage,
    models::ImageInput,
    validation::{HexColor, ValidatedRequest},
};
use serde_json::{json, Value};

/// Paint line the recommendations are framed around.
pub const PAINT_BRAND: &str = "SAYER";

const PERSONA: &str =
    "Act as an expert interior designer who specializes in wall paint color palettes for the SAYER brand.";

/// Everything a provider needs for one generation call.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub text: String,
    pub image: Option<ImageInput>,
    pub schema: Value,
}

impl Prompt {
    pub fn build(request: ValidatedRequest, language: DisplayLanguage) -> Self {
        let (text, image) = match request {
            ValidatedRequest::Color(hex) => (color_instruction(&hex, language), None),
            ValidatedRequest::Image(image) => (image_instruction(language), Some(image)),
        };

        Self {
            text,
            image,
            schema: response_schema(language),
        }
    }
}

fn language_clause(language: DisplayLanguage) -> String {
    format!(
        "IMPORTANT: All output, including palette names, descriptions and color names, MUST be in {}.",
        language.name()
    )
}

fn color_instruction(base: &HexColor, language: DisplayLanguage) -> String {
    format!(
        "{persona}\n\
         The user has selected a main wall color: {base}.\n\n\
         Your task is to generate exactly THREE distinct, aesthetically pleasing color palettes that complement this base color. \
         Each palette must represent a different mood or style. For each palette, provide a creative name, \
         a one-sentence description and a list of 2 to 4 colors.\n\n\
         The first color in every palette's color list MUST ALWAYS be the user's base color, exactly: {base}.\n\
         The following colors should be accent or complementary colors.\n\n\
         {language}\n\n\
         Follow the JSON schema precisely.",
        persona = PERSONA,
        base = base,
        language = language_clause(language),
    )
}

fn image_instruction(language: DisplayLanguage) -> String {
    format!(
        "{persona}\n\
         The user has uploaded an image of a space or an object as inspiration.\n\n\
         Your task is to analyze the image and generate exactly THREE distinct, aesthetically pleasing color palettes \
         inspired by its content and atmosphere. For each palette, provide a creative name, a one-sentence description \
         and a list of 2 to 4 complementary colors identified in or inspired by the image.\n\n\
         - Identify the dominant and accent colors in the image.\n\
         - Build palettes that would work well for painting interior walls.\n\
         - Palette colors must complement each other and reflect the style of the image (for example modern, rustic, vibrant).\n\n\
         {language}\n\n\
         Follow the JSON schema precisely.",
        persona = PERSONA,
        language = language_clause(language),
    )
}

/// Structured output schema: an array of `{name, description, colors: [{hex, name}]}`.
pub fn response_schema(language: DisplayLanguage) -> Value {
    let lang = language.name();
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {
                    "type": "STRING",
                    "description": format!("A creative, descriptive name for the color palette, in {}.", lang)
                },
                "description": {
                    "type": "STRING",
                    "description": format!("A short, one-sentence description in {} of the mood or style this palette evokes.", lang)
                },
                "colors": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "hex": {
                                "type": "STRING",
                                "description": "The hexadecimal color code, starting with '#'."
                            },
                            "name": {
                                "type": "STRING",
                                "description": format!("A simple, common name for the color, in {}.", lang)
                            }
                        },
                        "required": ["hex", "name"]
                    }
                }
            },
            "required": ["name", "description", "colors"]
        }
    })
}
