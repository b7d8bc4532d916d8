use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::shell::{default_playlist, Credentials, Track};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sorry".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Application settings, loaded from JSON; every field is optional in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    /// Fixed seed for scene placement; random when absent
    pub seed: Option<u64>,
    pub credentials: Credentials,
    pub playlist: Vec<Track>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            seed: None,
            credentials: Credentials::default(),
            playlist: default_playlist(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// File config, or defaults when `cli` names none, with CLI overrides applied
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(width) = cli.width {
            self.window.width = width;
        }
        if let Some(height) = cli.height {
            self.window.height = height;
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.playlist.is_empty(), "playlist must contain at least one track");
        ensure!(
            self.window.width > 0 && self.window.height > 0,
            "window size must be non-zero, got {}x{}",
            self.window.width,
            self.window.height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn empty_json_gives_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.playlist.len(), 4);
        assert_eq!(config.credentials.username, "sonu");
    }

    #[test]
    fn partial_window_section() {
        let config = AppConfig::from_json(r#"{ "window": { "width": 640 }, "seed": 7 }"#).unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn empty_playlist_is_invalid() {
        assert!(AppConfig::from_json(r#"{ "playlist": [] }"#).is_err());
    }

    #[test]
    fn cli_overrides_file_values() {
        let cli = Cli::parse_from(["apology-scene", "--seed", "42", "--width", "300"]);
        let mut config = AppConfig::from_json(r#"{ "seed": 1 }"#).unwrap();
        config.apply_cli(&cli);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.window.width, 300);
        assert_eq!(config.window.height, 768);
    }
}
