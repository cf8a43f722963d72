//! Runnable match server: all six games, no stats backend.
//!
//! ```sh
//! RUST_LOG=duelhall=debug cargo run -p arena-server
//! BIND=0.0.0.0:9000 cargo run -p arena-server
//! ```

use duelhall::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DuelhallError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:9000".to_string());
    tracing::info!(%bind, "starting arena server");

    let server = DuelhallServerBuilder::new()
        .bind(&bind)
        .build(NoopStats)
        .await?;

    server.run().await
}
