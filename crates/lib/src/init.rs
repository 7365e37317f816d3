//! Initialize the configuration directory: config file and the static audio directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = r#"{
  "gateway": { "port": 8000, "bind": "127.0.0.1" },
  "provider": { "username": "", "password": "", "number": "" },
  "publicUrl": "",
  "staticDir": "static"
}
"#;

/// Create the config directory and default files if they do not exist.
/// - Writes `config.json` with empty credentials (fill in, or use the ELK46_* / HOST_URL env vars).
/// - Creates `static/audio/` for the call recordings (`<kind>.mp3`).
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        std::fs::write(config_path, DEFAULT_CONFIG)
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }

    let audio_dir = config_dir.join("static").join("audio");
    if !audio_dir.exists() {
        std::fs::create_dir_all(&audio_dir)
            .with_context(|| format!("creating audio directory {}", audio_dir.display()))?;
        log::info!("created audio directory at {}", audio_dir.display());
    } else {
        log::debug!("audio directory already exists at {}, skipping", audio_dir.display());
    }

    Ok(config_dir.to_path_buf())
}
