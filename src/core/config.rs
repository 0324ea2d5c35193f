use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Server URL used when neither the config file nor `--server` names one.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Base URL of the chat server.
    pub server_url: Option<String>,
    /// UI theme name (e.g., "dark", "light").
    pub theme: Option<String>,
    /// Enable syntax highlighting for fenced code blocks.
    pub syntax: Option<bool>,
    /// Append tracing output to this file.
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Config, Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::get_config_path()?;
        self.save_to_path(&config_path)
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn get_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "spicechat")
            .ok_or("failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn syntax_enabled(&self) -> bool {
        self.syntax.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loading_a_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("temp directory");
        let config_path = temp_dir.path().join("missing.toml");

        let config = Config::load_from_path(&config_path).expect("load");

        assert_eq!(config.server_url, None);
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
        assert!(config.syntax_enabled());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let temp_dir = TempDir::new().expect("temp directory");
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            server_url: Some("http://spice.example".into()),
            theme: Some("light".into()),
            syntax: Some(false),
            log_file: Some(PathBuf::from("/tmp/spicechat.log")),
        };
        config.save_to_path(&config_path).expect("save");

        let loaded = Config::load_from_path(&config_path).expect("load");
        assert_eq!(loaded.server_url(), "http://spice.example");
        assert_eq!(loaded.theme.as_deref(), Some("light"));
        assert!(!loaded.syntax_enabled());
        assert_eq!(loaded.log_file, config.log_file);
    }
}
