mod types;

pub use types::*;

use crate::Result;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Reads the YAML config (if present) and layers environment overrides on top.
pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    debug!("Loading configuration from: {}", config_path);

    let config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => serde_yaml::from_str(&config_str)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}, using defaults", config_path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    Ok(apply_env_overrides(config, |key| env::var(key).ok()))
}

/// Applies overrides from `lookup`; unparsable numeric values are ignored.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("DO_MODEL_ACCESS_KEY") {
        config.inference.api_key = Some(key);
    }
    if let Some(model) = lookup("MODEL") {
        config.inference.model = model;
    }
    if let Some(url) = lookup("INFERENCE_URL") {
        config.inference.endpoint_url = url;
    }
    if let Some(cmd) = lookup("TESSERACT_CMD") {
        config.ocr.tesseract_cmd = cmd;
    }
    if let Some(lang) = lookup("OCR_LANG") {
        config.ocr.language = Some(lang);
    }
    if let Some(dir) = lookup("UPLOAD_DIR") {
        config.ocr.upload_dir = Some(PathBuf::from(dir));
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("Ignoring invalid PORT value: {}", port),
        }
    }

    config
}
