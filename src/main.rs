use anyhow::Result;
use clap::Parser;
use sukoon_client::{create_router, AppState, Config};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sukoon-client", about = "Client tier for the Sukoon mental-wellness assistant")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/sukoon-client")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("Sukoon client v0.1.0");
    info!("Loaded config: {}", cfg.service.name);
    info!("Inference backend at {}", cfg.backend.base_url);

    let state = AppState::with_timeout(
        cfg.backend.base_url.clone(),
        std::time::Duration::from_secs(cfg.backend.timeout_secs),
    );
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
