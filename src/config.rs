use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use log::warn;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// Process-wide settings, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub public_dir: PathBuf,
    pub template_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            upload_dir: PathBuf::from("uploads"),
            public_dir: PathBuf::from("public"),
            template_dir: PathBuf::from("templates"),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().trim_end_matches('/').to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.allowed_origins);

        Self {
            api_key: get("GEMINI_API_KEY"),
            model: get("GEMINI_MODEL").unwrap_or(defaults.model),
            api_base: get("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port),
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            public_dir: get("PUBLIC_DIR").map(PathBuf::from).unwrap_or(defaults.public_dir),
            template_dir: get("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.template_dir),
            allowed_origins,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                defaults.max_upload_bytes,
            ),
        }
    }

    pub fn template_glob(&self) -> String {
        format!("{}/**/*", self.template_dir.display())
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match raw {
        Some(value) => value.parse::<T>().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, value, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = config_from(&[]);
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = config_from(&[("GEMINI_API_KEY", "   ")]);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = config_from(&[("PORT", "http"), ("MAX_UPLOAD_BYTES", "-1")]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn origins_and_base_are_normalised() {
        let config = config_from(&[
            ("ALLOWED_ORIGINS", " https://chat.example.com/ , ,http://localhost:8080"),
            ("GEMINI_API_BASE", "http://127.0.0.1:9999/"),
            ("PORT", "8081"),
        ]);
        assert_eq!(
            config.allowed_origins,
            vec!["https://chat.example.com", "http://localhost:8080"]
        );
        assert_eq!(config.api_base, "http://127.0.0.1:9999");
        assert_eq!(config.port, 8081);
    }
}
