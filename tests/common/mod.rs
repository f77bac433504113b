#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gemini_chat_relay::{AppState, Config, GenerateContentRequest, GenerativeModel, ProviderError};
use reqwest::StatusCode;
use serde_json::{json, Value};

pub const BOUNDARY: &str = "----relay-test-boundary";

/// Model double that answers every call the same way and records requests.
pub struct ScriptedModel {
    reply: Reply,
    pub requests: Mutex<Vec<GenerateContentRequest>>,
}

enum Reply {
    Body(Value),
    Failure(StatusCode, String),
}

impl ScriptedModel {
    pub fn answering(body: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Body(body),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::answering(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        }))
    }

    pub fn failing(status: StatusCode, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Failure(status, body.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> GenerateContentRequest {
        self.requests.lock().unwrap().last().cloned().expect("model was called")
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted-model"
    }

    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<Value, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Failure(status, body) => Err(ProviderError::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

pub fn state(upload_dir: &Path, model: Arc<ScriptedModel>) -> AppState {
    let config = Config {
        upload_dir: upload_dir.to_path_buf(),
        template_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("templates"),
        ..Config::default()
    };
    AppState::new(config, model).expect("app state")
}

pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            FormPart::File {
                field,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        field, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn files_in(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read upload dir").count()
}
