use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    /// JSON file shaped `{collection: {key: document}}` loaded at startup.
    pub seed_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8787".into(),
            seed_path: None,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("APP__SEED_PATH") {
        settings.seed_path = Some(v);
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
        return;
    };
    if let Some(v) = file_cfg.get("bind_addr") {
        settings.server_bind = v.clone();
    }
    if let Some(v) = file_cfg.get("seed_path") {
        settings.seed_path = Some(v.clone());
    }
}

pub fn read_seed(path: &str) -> anyhow::Result<Value> {
    let path = Path::new(path);
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("seed file '{}' is not valid JSON", path.display()))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
