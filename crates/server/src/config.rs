use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub bind: String,
    pub docs_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8776".into(),
            docs_dir: "./api_doc".into(),
        }
    }
}

/// Defaults, overridden by `docserver.toml` in the working directory,
/// overridden in turn by `DOCSERVER_*` environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("docserver.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("bind") {
                settings.bind = v.clone();
            }
            if let Some(v) = file_cfg.get("docs_dir") {
                settings.docs_dir = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("DOCSERVER_BIND") {
        settings.bind = v;
    }

    if let Ok(v) = std::env::var("DOCSERVER_DOCS_DIR") {
        settings.docs_dir = v;
    }

    settings
}

pub fn prepare_docs_dir(raw_docs_dir: &str) -> anyhow::Result<PathBuf> {
    let docs_dir = normalize_docs_dir(raw_docs_dir);
    ensure_docs_dir_exists(&docs_dir)?;
    Ok(docs_dir)
}

fn normalize_docs_dir(raw_docs_dir: &str) -> PathBuf {
    let raw_docs_dir = raw_docs_dir.trim();

    if raw_docs_dir.is_empty() {
        return PathBuf::from(Settings::default().docs_dir);
    }

    PathBuf::from(raw_docs_dir.replace('\\', "/"))
}

fn ensure_docs_dir_exists(docs_dir: &Path) -> anyhow::Result<()> {
    let metadata = fs::metadata(docs_dir).with_context(|| {
        format!(
            "docs directory '{}' is not accessible; build the documentation tree first",
            docs_dir.display()
        )
    })?;

    if !metadata.is_dir() {
        anyhow::bail!("docs path '{}' is not a directory", docs_dir.display());
    }

    Ok(())
}
