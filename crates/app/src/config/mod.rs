use clap::Args;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/splitbook.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub session_path: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            session_path: "config/session.json".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override backend base URL (e.g. http://127.0.0.1:3000).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override where the signed-in user is stored.
    #[arg(long, global = true)]
    pub session: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

/// File, then `SPLITBOOK_*` environment, then command-line flags.
pub fn load(args: &ConfigArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SPLITBOOK"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(session) = &args.session {
        settings.session_path = session.clone();
    }
    if let Some(level) = &args.log_level {
        settings.log_level = level.clone();
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = ConfigArgs {
            config: Some("config/does-not-exist.toml".to_string()),
            base_url: Some("http://backend.test:8080".to_string()),
            session: Some("/tmp/splitbook-session.json".to_string()),
            log_level: Some("debug".to_string()),
        };
        let config = load(&args).unwrap();
        assert_eq!(config.base_url, "http://backend.test:8080");
        assert_eq!(config.session_path, "/tmp/splitbook-session.json");
        assert_eq!(config.log_level, "debug");
    }
}
