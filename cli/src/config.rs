use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

const DEFAULT_ANALYZER_URL: &str = "http://localhost:5000";

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
    pub analyzer_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "nosh").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = data_dir.join("nosh.db");

        let analyzer_url = std::env::var("NOSH_ANALYZER_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ANALYZER_URL.to_string());

        Ok(Config {
            db_path,
            data_dir,
            analyzer_url,
        })
    }
}
