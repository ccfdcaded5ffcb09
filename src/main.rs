use palettegen::{
    logger::{self, LoggerConfig},
    server, Config,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    let logger_config = if config.json_logs {
        LoggerConfig::production()
    } else {
        LoggerConfig::development()
    };
    let logger_config = match std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| logger::LogLevel::parse(&level))
    {
        Some(level) => logger_config.with_level(level),
        None => logger_config,
    };
    logger::init_with_config(logger_config)?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    if let Err(e) = server::run(config).await {
        log::error!("❌ Server stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}
