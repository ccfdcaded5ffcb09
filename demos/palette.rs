//! Generates palettes directly against Gemini, without the proxy.
//!
//! cargo run --example palette -- '#87CEEB'
//! cargo run --example palette -- path/to/room.jpg

use palettegen::{
    contrast_color, validate, Config, ImageInput, PaletteRequest, PaletteService,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    palettegen::logger::init()?;

    let input = env::args().nth(1).unwrap_or_else(|| "#87CEEB".to_string());
    let request = if input.starts_with('#') {
        PaletteRequest::color(input)
    } else {
        PaletteRequest::image(ImageInput::from_path(&input)?)
    };

    let service = PaletteService::from_config(&Config::from_env())?;
    let palettes = service.generate(validate(request)?).await?;

    for palette in palettes {
        println!("{}: {}", palette.name, palette.description);
        for color in palette.colors {
            println!(
                "  {} {} (text {})",
                color.hex,
                color.name,
                contrast_color(&color.hex)
            );
        }
    }

    Ok(())
}
