//! WebSocket server streaming agent hand-offs and cook steps
//!
//! Each connection gets an ordered outbound queue drained by a writer task
//! and a cancellation token. `job:start` and `cook:start` run as spawned
//! tasks; `cook:next` is answered inline by the read loop. Closing the
//! socket cancels the token, which drops any generation call in flight.

pub mod cook;
pub mod job;
pub mod protocol;
pub mod sink;

pub use protocol::{ClientEvent, JobStatus, ServerEvent};
pub use sink::EventSink;

use crate::agent::RoleInvoker;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::{spawn_sweeper, CookSessionStore, InMemoryCookSessionStore};
use axum::extract::ws::{Message, WebSocket};
use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
    routing::get,
    Json, Router,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Shared state handed to every connection
#[derive(Clone)]
pub struct AppState {
    pub invoker: RoleInvoker,
    pub sessions: Arc<dyn CookSessionStore>,
}

impl AppState {
    pub fn new(invoker: RoleInvoker, sessions: Arc<dyn CookSessionStore>) -> Self {
        Self { invoker, sessions }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let invoker = RoleInvoker::from_config(&config.generation, config.models.clone())?;
        Ok(Self::new(invoker, Arc::new(InMemoryCookSessionStore::new())))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(websocket_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn serve(config: &Config, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(
        state.sessions.clone(),
        config.sessions.clone(),
        shutdown.clone(),
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("CookOS listening on http://{}", addr);

    let signal = shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    sweeper.await.ok();
    Ok(())
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "offline": state.invoker.is_offline(),
        "sessions": state.sessions.session_count().await,
    }))
}

async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4();
    info!("client connected: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (sink, mut events) = EventSink::channel();
    let cancel = CancellationToken::new();

    // Send events to client in emission order
    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                dispatch(&state, &sink, &cancel, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("Socket error on {}: {}", connection_id, e);
                break;
            }
        }
    }

    cancel.cancel();
    writer.abort();
    info!("client disconnected: {}", connection_id);
}

/// Route one inbound frame.
///
/// `job:start` and `cook:start` are spawned and their handle returned.
/// `cook:next` is answered before returning so steps go out in request order.
pub async fn dispatch(
    state: &AppState,
    sink: &EventSink,
    cancel: &CancellationToken,
    text: &str,
) -> Option<JoinHandle<()>> {
    let event = match protocol::parse_client_event(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Rejecting inbound frame: {}", e);
            sink.error(e.to_string());
            return None;
        }
    };
    debug!("Received {}", event.name());

    match event {
        ClientEvent::JobStart(request) => {
            let (state, sink, token) = (state.clone(), sink.clone(), cancel.child_token());
            Some(tokio::spawn(async move {
                job::handle_job_start(&state, &sink, request, token).await;
            }))
        }
        ClientEvent::CookStart(request) => {
            let (state, sink, token) = (state.clone(), sink.clone(), cancel.child_token());
            Some(tokio::spawn(async move {
                cook::handle_cook_start(&state, &sink, request, token).await;
            }))
        }
        ClientEvent::CookNext(request) => {
            cook::handle_cook_next(state, sink, request).await;
            None
        }
    }
}

/// Run a flow, racing it against `cancel`, and report failures to the client
pub(crate) async fn run_guarded<F>(
    flow: &str,
    sink: &EventSink,
    cancel: &CancellationToken,
    work: F,
) where
    F: Future<Output = Result<()>>,
{
    let result = tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled(flow.to_string())),
        result = work => result,
    };

    match result {
        Ok(()) => {}
        Err(Error::Cancelled(_)) => info!("{} cancelled, connection closed", flow),
        Err(e) => {
            error!("{} failed: {}", flow, e);
            sink.error(e.to_string());
            sink.status(JobStatus::Error);
        }
    }
}
