use std::sync::Arc;

use actix_files as fs;
use actix_web::{middleware, web::Data, App, HttpServer};
use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;

use gemini_chat_relay::web::routes;
use gemini_chat_relay::{AppState, Config, GeminiModel};

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    info!("Starting Gemini chat relay");

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("Failed to create upload directory {}", config.upload_dir.display()))?;

    let model = Arc::new(GeminiModel::new(&config)?);
    let app_state = Data::new(AppState::new(config.clone(), model)?);

    let bind = (config.host.clone(), config.port);
    info!("Server running on http://{}:{}", bind.0, bind.1);
    info!("Chat API: http://{}:{}/api/chat", bind.0, bind.1);
    info!("Health check: http://{}:{}/api/health", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&config))
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
            .service(fs::Files::new("/", &config.public_dir))
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}
