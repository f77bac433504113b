use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use base64::engine::general_purpose::STANDARD as B64_ENGINE;
use base64::Engine;
use log::{debug, error, info};
use serde_json::Value;
use tera::Context;

use crate::error::ApiError;
use crate::model::{extract_text, GenerateContentRequest, Part};
use crate::web::models::{
    timestamp, ChatMessage, ChatRequest, ChatResponse, GenerateTextRequest, GenerationResponse,
    HealthResponse,
};
use crate::web::upload::{read_attachment_form, AttachmentKind};
use crate::AppState;

// Index page handler
pub async fn index(data: web::Data<AppState>) -> impl Responder {
    let mut context = Context::new();
    context.insert("model", data.model.name());
    context.insert("max_upload_bytes", &data.config.max_upload_bytes);
    context.insert("max_upload_mb", &(data.config.max_upload_bytes / (1024 * 1024)));

    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: "Gemini AI Chatbot API is running".to_string(),
        timestamp: timestamp(),
    })
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let messages = parse_messages(req.into_inner())?;
    info!("Chat request with {} message(s)", messages.len());

    let request = GenerateContentRequest::conversation(
        messages.iter().map(|m| (m.role.as_str(), m.content.as_str())),
    );
    debug!("Formatted contents: {:?}", request.contents);

    match data.model.generate_content(&request).await {
        Ok(response) => {
            let result = extract_text(&response);
            info!("Chat response length: {} characters", result.len());

            Ok(HttpResponse::Ok().json(ChatResponse {
                result,
                status: "success".to_string(),
                timestamp: timestamp(),
            }))
        }
        Err(e) => {
            error!("Chat endpoint error: {}", e);
            Err(ApiError::from_chat_failure(&e))
        }
    }
}

fn parse_messages(req: ChatRequest) -> Result<Vec<ChatMessage>, ApiError> {
    let items = match req.messages {
        Some(Value::Array(items)) => items,
        _ => {
            return Err(ApiError::validation(
                "Invalid input format. Expected messages array.",
            ))
        }
    };

    if items.is_empty() {
        return Err(ApiError::validation("Messages array cannot be empty."));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<ChatMessage>(item).map_err(|e| {
                ApiError::validation(format!("Invalid message at index {}: {}", i, e))
            })
        })
        .collect()
}

// Single-turn text generation, no history
pub async fn generate_text(
    data: web::Data<AppState>,
    req: web::Json<GenerateTextRequest>,
) -> Result<HttpResponse, ApiError> {
    let prompt = match req.into_inner().prompt {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return Err(ApiError::validation("Tulis sebuah prompt!")),
    };

    let request = GenerateContentRequest::single_turn(vec![Part::text(prompt)]);
    let response = data.model.generate_content(&request).await.map_err(|e| {
        error!("Text generation error: {}", e);
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(GenerationResponse {
        result: extract_text(&response),
    }))
}

pub async fn generate_from_image(
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    generate_from_attachment(data, payload, AttachmentKind::Image).await
}

pub async fn generate_from_document(
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    generate_from_attachment(data, payload, AttachmentKind::Document).await
}

pub async fn generate_from_audio(
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    generate_from_attachment(data, payload, AttachmentKind::Audio).await
}

// The upload is owned by `form` and removed when it drops at the end of this
// function, on every path out of it.
async fn generate_from_attachment(
    data: web::Data<AppState>,
    payload: Multipart,
    kind: AttachmentKind,
) -> Result<HttpResponse, ApiError> {
    let form = read_attachment_form(
        payload,
        kind,
        &data.config.upload_dir,
        data.config.max_upload_bytes,
    )
    .await?;

    let prompt = form.prompt_or_default(kind);
    let file = form
        .file
        .as_ref()
        .ok_or_else(|| ApiError::validation(kind.missing_file_message()))?;

    info!(
        "Generating from {} {:?} ({}, {} bytes)",
        kind.field_name(),
        file.original_name(),
        file.mime_type(),
        file.size()
    );

    let encoded = B64_ENGINE.encode(file.read().await.map_err(|e| {
        error!("Failed to read {} upload: {}", kind.field_name(), e);
        ApiError::from(e)
    })?);

    let request = GenerateContentRequest::single_turn(vec![
        Part::text(prompt),
        Part::inline(file.mime_type(), encoded),
    ]);

    let response = data.model.generate_content(&request).await.map_err(|e| {
        error!("{} processing error: {}", kind.field_name(), e);
        ApiError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(GenerationResponse {
        result: extract_text(&response),
    }))
}
