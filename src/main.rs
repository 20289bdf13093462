//! CLI for streamlink
//!
//! Connects to a stream server and runs the console client. Configuration
//! comes from `config/default.*`, `STREAMLINK__*` environment variables (a
//! `.env` file is honored) and finally the flags below.

use clap::Parser;
use streamlink::client::console;
use streamlink::config::{load_config, load_dotenv};
use streamlink::utils::logging;
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "streamlink", about = "Console client for a WebSocket stream server")]
struct Cli {
    /// WebSocket server URL, e.g. ws://127.0.0.1:8080/
    #[arg(long)]
    url: Option<String>,
    /// Client id to announce (default: a random client-<uuid>)
    #[arg(long)]
    client_id: Option<String>,
    /// Stream to subscribe to once connected
    #[arg(long)]
    stream: Option<String>,
    /// Re-request the subscribed stream every N milliseconds (0 = never)
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let dotenv_failure = load_dotenv();
    let cli = Cli::parse();

    let mut settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            if let Some(failure) = dotenv_failure {
                warn!("{failure}");
            }
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Some(url) = cli.url {
        settings.client.url = url;
    }
    if let Some(client_id) = cli.client_id {
        settings.client.client_id = Some(client_id);
    }
    if let Some(stream) = cli.stream {
        settings.client.stream = Some(stream);
    }
    if let Some(ms) = cli.poll_interval_ms {
        settings.client.poll_interval_ms = ms;
    }
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }

    logging::init(&settings.logging.level);
    if let Some(failure) = dotenv_failure {
        warn!("{failure}");
    }
    console::run(settings).await;
}
