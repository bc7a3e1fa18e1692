//! linkmeter exporter binary.
//!
//! Polls each configured counter source on its own cadence and serves the
//! resulting metric values to a pull-based collector:
//! - /metrics : exposition text format
//! - /healthz : liveness

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use linkmeter_exporter::{app_state, config, poll, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_from_file("linkmeter.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .exporter
        .listen
        .parse()
        .expect("exporter.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg);
    poll::spawn_pollers(&state).expect("poller setup failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "linkmeter-exporter starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
