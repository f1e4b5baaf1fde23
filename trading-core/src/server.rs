use axum::Router;
use log::info;
use std::net::SocketAddr;

/// Binds `0.0.0.0:<port>` and serves `app` until the process stops.
pub async fn serve(name: &str, app: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("{} listening on {}", name, addr);

    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn health_check() -> &'static str {
    "OK"
}
