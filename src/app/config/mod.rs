use crate::app::cli::Args;
use std::fs;
use std::path::PathBuf;

pub mod user;

pub use user::{UserConfig, DEFAULT_SERVER_URL};

pub struct AppConfig;

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let xdg_dir = home.join(".config").join("cadence");

        if !xdg_dir.exists() {
            let _ = fs::create_dir_all(&xdg_dir);
        }

        xdg_dir
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    pub fn get_log_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cadence")
    }

    /// Load `config.toml`, writing the defaults first if it is missing.
    /// A file that fails to parse falls back to defaults.
    pub fn load() -> UserConfig {
        let config_path = Self::get_config_path();

        if config_path.exists() {
            match fs::read_to_string(&config_path) {
                Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!(path = %config_path.display(), error = %e, "invalid config, using defaults");
                    UserConfig::default()
                }),
                Err(_) => UserConfig::default(),
            }
        } else {
            let c = UserConfig::default();
            if let Ok(content) = toml::to_string_pretty(&c) {
                let _ = fs::write(&config_path, content);
            }
            c
        }
    }

    /// Command-line values win over the file.
    pub fn merge_args(mut config: UserConfig, args: &Args) -> UserConfig {
        if let Some(id) = &args.queue_id {
            config.queue_id = Some(id.clone());
        }
        if let Some(server) = &args.server {
            config.server_url = server.clone();
        }
        if let Some(buffer) = args.latency_buffer {
            config.latency_buffer_ms = buffer;
        }
        config
    }

    pub fn generate_default() -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(&UserConfig::default())?)
    }
}
