pub mod config;
pub mod error;
pub mod model;
pub mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use tera::Tera;

pub use config::Config;
pub use error::ApiError;
pub use model::{GeminiModel, GenerateContentRequest, GenerativeModel, ProviderError};

// Shared, read-only state handed to every handler
pub struct AppState {
    pub tera: Tera,
    pub model: Arc<dyn GenerativeModel>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config, model: Arc<dyn GenerativeModel>) -> Result<Self> {
        let mut tera = Tera::new(&config.template_glob())
            .with_context(|| format!("Template parsing error in {}", config.template_dir.display()))?;
        tera.autoescape_on(vec![".html"]);

        Ok(Self { tera, model, config })
    }
}
