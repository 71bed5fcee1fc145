use anyhow::Result;
use clap::{Arg, Command};
use std::sync::Arc;
use tracing::{info, warn};

use course_generator::api::{ApiServer, AppState};
use course_generator::config::Config;
use course_generator::llm::create_llm;
use course_generator::reading::ReadingContentFinder;
use course_generator::youtube::YouTubeClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "course_generator=info,tower_http=warn".into()),
        )
        .init();

    let matches = Command::new("Course Generator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates AI course outlines with a video per lesson")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a TOML configuration file"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("ADDR")
                .help("Address to bind to (overrides configuration)"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on (overrides configuration)"),
        )
        .get_matches();

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    if let Some(host) = matches.get_one::<String>("host") {
        config.server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<String>("port") {
        config.server.port = port.parse()?;
    }

    config.validate()?;

    info!("🚀 Course generator starting...");
    info!(
        "🧠 LLM provider: {:?} ({})",
        config.llm.provider, config.llm.model
    );
    if config.web_search.api_key.is_none() {
        info!("Reading-content search not configured, the feature will return empty results");
    }

    let llm = create_llm(&config.llm)?;
    if !llm.is_available().await {
        warn!("LLM provider is not reachable, outline generation will fail until it is");
    }

    let video_search = YouTubeClient::new(config.youtube.api_key.clone().unwrap_or_default());
    let reading = ReadingContentFinder::new(
        config.web_search.api_key.clone().unwrap_or_default(),
        config.web_search.engine_id.clone().unwrap_or_default(),
        config.web_search.result_count,
        config.web_search.fetch_timeout_seconds,
    );

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = AppState {
        llm: Arc::from(llm),
        video_search: Arc::new(video_search),
        reading: Arc::new(reading),
        config: Arc::new(config),
    };

    ApiServer::new(state, host, port).start().await
}
