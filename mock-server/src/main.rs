use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        eprintln!("tracing init failed: {e}");
    }

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, username = mock_server::USERNAME, "mock Convore API listening under /api");
    mock_server::run(listener).await
}
