use std::path::Path;

use isi_lib::{Config, IsiError};

pub fn load_config(path: Option<&Path>) -> Result<Config, IsiError> {
    let cfg = if let Some(p) = path {
        Config::from_toml_file(p).map_err(|e| {
            IsiError::Config(format!("Failed to read config {}: {}", p.display(), e))
        })?
    } else {
        Config::default()
    };

    cfg.validate()
        .map_err(|e| IsiError::Config(format!("Invalid config: {}", e)))?;
    log_effective_config(path, &cfg);
    Ok(cfg)
}

fn log_effective_config(config_path: Option<&Path>, cfg: &Config) {
    let config_source = config_path
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "defaults/built-in".to_string());
    tracing::info!(
        source = %config_source,
        emission_factor = cfg.emission_factor,
        importance_overrides = cfg.importance.len(),
        profiles = ?cfg.profiles.keys().collect::<Vec<_>>(),
        "effective config"
    );
}
