//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use curation_scraper::{ConfigError, ScraperConfig};

/// Env var naming a config file when `--config` is absent.
pub const ENV_CONFIG: &str = "CURATION_SCRAPER_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG: &str = ".curation-scraper.json";

/// Resolve the config file path: explicit flag, then env var, then the
/// working-directory file if it exists.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        if !env_path.trim().is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    local.exists().then_some(local)
}

/// Load the effective config, with env overrides applied last.
pub fn resolve_config(explicit: Option<&str>) -> Result<ScraperConfig, ConfigError> {
    let config = match resolve_config_path(explicit) {
        Some(path) => load(&path)?,
        None => ScraperConfig::default(),
    };
    Ok(config.apply_env())
}

fn load(path: &Path) -> Result<ScraperConfig, ConfigError> {
    tracing::debug!("loading config from {}", path.display());
    ScraperConfig::from_json_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            resolve_config_path(Some("/tmp/explicit.json")),
            Some(PathBuf::from("/tmp/explicit.json"))
        );
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_list_items": 4, "max_nav_length": 100}}"#).unwrap();

        let cfg = resolve_config(file.path().to_str()).unwrap();
        assert_eq!(cfg.max_list_items, 4);
        assert_eq!(cfg.max_nav_length, 100);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = resolve_config(Some("/nonexistent/curation.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
