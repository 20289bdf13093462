mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{ClientSettings, LoggingSettings, Settings};

/// Environment variables look like `STREAMLINK__CLIENT__URL`.
const ENV_PREFIX: &str = "STREAMLINK";

/// Loads `.env` into the process environment. A missing file is normal; any
/// other failure comes back as a message to log once logging is set up.
pub fn load_dotenv() -> Option<String> {
    dotenv_failure(dotenvy::dotenv())
}

fn dotenv_failure<T>(result: dotenvy::Result<T>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!("Failed to load .env: {e}")),
        _ => None,
    }
}

/// Loads the configuration from `config/default` (any format the `config`
/// crate understands, optional) and `STREAMLINK__*` environment variables,
/// then fills whatever is missing from `Settings::default()`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;
    let default = Settings::default();

    let client = partial.client;
    let logging = partial.logging;

    Ok(Settings {
        client: ClientSettings {
            url: client
                .as_ref()
                .and_then(|c| c.url.clone())
                .unwrap_or(default.client.url),
            client_id: client
                .as_ref()
                .and_then(|c| c.client_id.clone())
                .filter(|id| !id.is_empty())
                .or(default.client.client_id),
            stream: client
                .as_ref()
                .and_then(|c| c.stream.clone())
                .filter(|s| !s.is_empty())
                .or(default.client.stream),
            poll_interval_ms: client
                .as_ref()
                .and_then(|c| c.poll_interval_ms)
                .unwrap_or(default.client.poll_interval_ms),
        },
        logging: LoggingSettings {
            level: logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}

#[cfg(test)]
mod tests;
