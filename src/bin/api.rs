use confidence_coach::api::start_server;
use confidence_coach::config::CoachConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Missing GEMINI_API_KEY is a fatal startup error.
    let config = match CoachConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            eprintln!("See .env.example for setup instructions");
            std::process::exit(1);
        }
    };

    info!("ConfidenceAI coach - API server");
    info!("Port: {}", config.port);
    info!(
        "Generation retries: {}, max message length: {}",
        config.max_retries, config.max_message_length
    );

    start_server(config).await?;

    Ok(())
}
