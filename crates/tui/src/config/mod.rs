use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/spendtrack.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the identity gateway.
    pub identity_url: String,
    /// Base URL of the record store.
    pub store_url: String,
    /// Backend project API key, sent on every request.
    pub api_key: String,
    /// Email to pre-fill on the sign-in form.
    pub email: String,
    /// IANA timezone used when rendering timestamps.
    pub timezone: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identity_url: "http://127.0.0.1:9099".to_string(),
            store_url: "http://127.0.0.1:8080".to_string(),
            api_key: String::new(),
            email: String::new(),
            timezone: "UTC".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "spendtrack_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override identity gateway base URL.
    #[arg(long)]
    identity_url: Option<String>,
    /// Override record store base URL.
    #[arg(long)]
    store_url: Option<String>,
    /// Override API key.
    #[arg(long)]
    api_key: Option<String>,
    /// Override prefilled email (password is never read from CLI).
    #[arg(long)]
    email: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override log level (e.g. debug).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SPENDTRACK"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(identity_url) = args.identity_url {
        settings.identity_url = identity_url;
    }
    if let Some(store_url) = args.store_url {
        settings.store_url = store_url;
    }
    if let Some(api_key) = args.api_key {
        settings.api_key = api_key;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}
