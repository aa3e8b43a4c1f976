use learnmate::config::Config;
use learnmate::groq_client::{CompletionApi, GroqClient};
use learnmate::{build_router, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    let config = Config::from_env()?;

    // Initialize Groq client if API key is provided
    let completion: Option<Arc<dyn CompletionApi>> = match config.groq_api_key.clone() {
        Some(api_key) => {
            tracing::info!("Initializing Groq client ({})...", config.groq_model);
            let client = GroqClient::with_endpoint(
                api_key,
                config.groq_api_url.clone(),
                config.groq_model.clone(),
            );
            Some(Arc::new(client) as Arc<dyn CompletionApi>)
        }
        None => {
            tracing::warn!("GROQ_API_KEY not found. /api/chat will answer with a server error.");
            tracing::info!("To enable the relay, set: GROQ_API_KEY (and optionally GROQ_API_URL, GROQ_MODEL)");
            None
        }
    };

    let app = build_router(Arc::new(AppState { completion }));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,learnmate=trace,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,learnmate=info,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    // JSON for log aggregation, human-readable otherwise
    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

    tracing::info!("📘 LearnMate starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Build mode: {}", if cfg!(debug_assertions) { "development" } else { "production" });
    tracing::info!("Log level: {}", log_level);

    Ok(())
}
