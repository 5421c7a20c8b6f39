use clap::Parser;
use discomfort_index::server::{self, AppState};
use tracing_subscriber::EnvFilter;

/// Discomfort index HTTP service.
///
/// Resolves the caller's IP to a location, fetches current weather there,
/// and returns a perceived-comfort score as JSON.
///
/// Examples:
///   discomfort --api-key KEY
///   discomfort --port 8080 --api-path /discomfort
///   discomfort --ip-address 203.0.113.5
#[derive(Parser)]
#[command(name = "discomfort", version, about, long_about = None)]
struct Cli {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 18080)]
    port: u16,

    /// HTTP path serving the index.
    #[arg(long, default_value = "/di")]
    api_path: String,

    /// Fixed IP address to score instead of detecting the caller's.
    #[arg(long)]
    ip_address: Option<String>,

    /// WeatherAPI.com API key.
    #[arg(long, env = "WEATHERAPI_API_KEY", hide_env_values = true)]
    api_key: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let state = AppState::new(cli.api_key, cli.ip_address);
    server::start(&cli.host, cli.port, &cli.api_path, state).await;
}
