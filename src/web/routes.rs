use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{error, web};
use log::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/api")
                .route("/chat", web::post().to(handlers::chat))
                .route("/health", web::get().to(handlers::health_check)),
        )
        .route("/", web::get().to(handlers::index))
        .route("/generate-text", web::post().to(handlers::generate_text))
        .route("/generate-from-image", web::post().to(handlers::generate_from_image))
        .route("/generate-from-document", web::post().to(handlers::generate_from_document))
        .route("/generate-from-audio", web::post().to(handlers::generate_from_audio));
}

/// Undecodable JSON bodies are reported with the usual `{error}` shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("Rejected JSON body: {}", err);
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            other => format!("Invalid JSON body: {}", other),
        };
        ApiError::validation(message).into()
    })
}

/// Only GET and POST from the configured origins, with `Content-Type` as
/// the single allowed request header.
pub fn cors(config: &Config) -> Cors {
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
}
