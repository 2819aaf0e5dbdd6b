use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default log filter; `RUST_LOG` overrides it
    pub log_level: Option<String>,
    pub walk: WalkConfig,
    pub narration: NarrationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkConfig {
    /// 0 = unlimited
    pub max_steps: usize,
    /// Persona names fielded by `origami walk` when none are given on the command line
    pub personas: Vec<String>,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_steps: 100,
            personas: vec![
                "Herald".to_string(),
                "Seeker".to_string(),
                "Sentinel".to_string(),
                "Weaver".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    pub milestone_interval: usize,
    pub show_eta: bool,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            milestone_interval: 5,
            show_eta: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            walk: WalkConfig::default(),
            narration: NarrationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.walk.max_steps, 100);
        assert_eq!(config.walk.personas.len(), 4);
        assert_eq!(config.narration.milestone_interval, 5);
        assert!(config.narration.show_eta);
    }

    #[test]
    fn test_load_explicit_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "walk:\n  max_steps: 7\n  personas: [Herald]\nnarration:\n  show_eta: false").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.walk.max_steps, 7);
        assert_eq!(config.walk.personas, vec!["Herald"]);
        assert!(!config.narration.show_eta);
        assert_eq!(config.narration.milestone_interval, 5);
        assert_eq!(config.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn test_log_level_sets_filter() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_level: debug").unwrap();

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.log_filter(), "debug");

        let unset = Config {
            log_level: None,
            ..Config::default()
        };
        assert_eq!(unset.log_filter(), "info");
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/origami.yml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "walk: [not, a, map]").unwrap();
        assert!(Config::load(Some(&file.path().to_path_buf())).is_err());
    }
}
