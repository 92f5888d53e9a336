use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;
use crate::forward::Forwarder;

pub struct AppState {
    pub forwarder: Forwarder,
    pub event_source: String,
}

/// Accepts event batches from the streaming trigger and runs one
/// forwarding invocation per request.
pub struct IngestServer {
    state: Arc<AppState>,
    listener: TcpListener,
}

impl IngestServer {
    pub async fn bind(config: &Config) -> anyhow::Result<Self> {
        let addr: SocketAddr = config.server.parse()?;
        let forwarder = Forwarder::try_new(config)?;

        match TcpListener::bind(addr).await {
            Ok(listener) => Ok(Self {
                state: Arc::new(AppState {
                    forwarder,
                    event_source: config.event_source.clone(),
                }),
                listener,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                anyhow::bail!(
                    "Failed to start ingest server: port {} is already in use",
                    addr.port()
                );
            }
            Err(e) => anyhow::bail!("Failed to bind to address {}: {}", addr, e),
        }
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("Ingest server listening on {}", self.listener.local_addr()?);

        let app = get_app(self.state);
        axum::serve(self.listener, app).await?;

        Ok(())
    }
}

pub fn get_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ingest", post(ingest))
        .with_state(state)
}

async fn ingest(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> StatusCode {
    // The trigger may hand over a single event or an array of events
    let messages = match body {
        Value::Array(values) => values,
        single => vec![single],
    };

    info!(
        "Received {} event(s) from {}",
        messages.len(),
        state.event_source
    );

    match state.forwarder.forward(messages).await {
        Ok(_) => StatusCode::ACCEPTED,
        Err(e) => {
            error!("Invocation failed for {}: {:#}", state.event_source, e);
            StatusCode::BAD_GATEWAY
        }
    }
}
