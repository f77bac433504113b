use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::model::ProviderError;
use crate::web::models::timestamp;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),
    #[error("Invalid API key or API key not configured")]
    Unauthorized,
    #[error("API quota exceeded")]
    QuotaExceeded,
    /// Provider failure on the chat route; carries the provider's message.
    #[error("Failed to generate response")]
    ChatFailed(String),
    /// Any other failure on the single-turn and attachment routes.
    #[error("{0}")]
    Generation(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Classifies a chat failure by the provider's own wording.
    pub fn from_chat_failure(err: &ProviderError) -> Self {
        let message = err.to_string();
        if message.contains("API_KEY") {
            ApiError::Unauthorized
        } else if message.contains("quota") {
            ApiError::QuotaExceeded
        } else {
            ApiError::ChatFailed(message)
        }
    }

    pub fn body(&self) -> ErrorBody {
        let error = self.to_string();
        match self {
            ApiError::Validation(_) | ApiError::Generation(_) => ErrorBody {
                error,
                message: None,
                timestamp: None,
            },
            ApiError::Unauthorized => ErrorBody {
                error,
                message: Some("Please check your Gemini API key configuration".to_string()),
                timestamp: None,
            },
            ApiError::QuotaExceeded => ErrorBody {
                error,
                message: Some("Please try again later".to_string()),
                timestamp: None,
            },
            ApiError::ChatFailed(message) => ErrorBody {
                error,
                message: Some(if message.is_empty() {
                    "Internal server error".to_string()
                } else {
                    message.clone()
                }),
                timestamp: Some(timestamp()),
            },
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Generation(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Generation(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ChatFailed(_) | ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}
