use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use orb_gate::{app, config::Config, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    if config.uses_default_password() {
        tracing::warn!("⚠️  Running with the default APP_PASSWORD, this is not safe outside development");
    }
    if !config.password_protection {
        tracing::warn!("⚠️  Password protection disabled, every page is public");
    }

    let addr = config.bind_addr;
    let state = AppState::new(config);
    let app = app(state);

    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
