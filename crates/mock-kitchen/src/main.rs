//! Standalone mock Kitchen backend for local CLI runs.
//!
//! Listens on `127.0.0.1:$MOCK_KITCHEN_PORT` (default `8000`, the SDK's
//! default origin). Log in with `chef@kitchen.test` / `password`.

use mock_kitchen::{router, MockKitchen, DEMO_EMAIL};
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("MOCK_KITCHEN_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);

    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(address = %addr, account = DEMO_EMAIL, "mock kitchen listening");
    axum::serve(listener, router(MockKitchen::new())).await
}
