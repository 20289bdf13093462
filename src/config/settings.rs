use serde::Deserialize;

/// Top-level configuration settings for the client.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    pub client: ClientSettings,
    pub logging: LoggingSettings,
}

/// Where to connect, who to be and what to follow.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientSettings {
    pub url: String,
    /// Announced identity. `None` means a random id is generated per run.
    pub client_id: Option<String>,
    /// Stream to subscribe to as soon as the connection opens.
    pub stream: Option<String>,
    /// How often to re-request the subscribed stream. 0 disables polling.
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled in from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub client: Option<PartialClientSettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialClientSettings {
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub stream: Option<String>,
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client: ClientSettings {
                url: "ws://127.0.0.1:8080/".to_string(),
                client_id: None,
                stream: None,
                poll_interval_ms: 0,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
            },
        }
    }
}
