use riskview::routes;
use riskview::state::AppState;
use riskview::{HistoryClient, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        tracing::warn!(error = %err, "failed to load .env");
    }

    if let Err(err) = run().await {
        tracing::error!(error = %err, "riskview stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let history = HistoryClient::new(&config.upstream)?;
    tracing::info!(api_base = history.base_url(), "history relay configured");
    tracing::info!(view_tag = %config.render.tag_name, raw_html = config.render.allow_raw_html, "render options");

    let app = routes::leptos_app(AppState::new(history, config.render))?;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, "riskview listening");
    axum::serve(listener, app).await?;
    Ok(())
}
