use std::net::SocketAddr;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{error, info};

#[derive(Clone)]
struct ServerState {
    snapshot: PathBuf,
}

/// Spawn the snapshot server on its own thread so the detection loop never
/// shares a runtime with HTTP handling.
pub fn start_snapshot_server(addr: SocketAddr, snapshot: PathBuf) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("snapshot-server".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("failed to build snapshot server runtime: {e:?}");
                    return;
                }
            };

            runtime.block_on(async move {
                let app = Router::new()
                    .fallback(get(serve_snapshot))
                    .with_state(ServerState { snapshot });

                let listener = match tokio::net::TcpListener::bind(addr).await {
                    Ok(l) => l,
                    Err(e) => {
                        error!("failed to bind snapshot server on {addr}: {e:?}");
                        return;
                    }
                };
                info!("serving snapshots on http://{addr}");

                if let Err(e) = axum::serve(listener, app).await {
                    error!("snapshot server stopped: {e:?}");
                }
            });
        })
        .context("failed to spawn snapshot server thread")
}

// Every path serves the same latest snapshot; cast clients request a fresh
// name per event to get around their own caching.
async fn serve_snapshot(State(state): State<ServerState>) -> Response {
    match tokio::fs::read(&state.snapshot).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "image/jpeg"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "no snapshot captured yet").into_response(),
    }
}
