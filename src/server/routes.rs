use super::assets::INDEX_HTML;
use crate::fs::{FileSystem, RealFs};
use crate::model::{GraphView, ModelSummary, NodeDetail};
use crate::session::Session;
use crate::snapshot::{ExpansionSnapshot, save_snapshot};
use crate::style;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
///
/// A server owns exactly one session; every request reads or mutates it under
/// the lock, so concurrent expand/collapse calls are applied one at a time.
pub struct AppState {
    pub session: RwLock<Session>,
    /// Where the expansion state is written after each change, if anywhere.
    pub state_path: Option<PathBuf>,
    fs: Arc<dyn FileSystem>,
    /// Held from snapshot to write so saves land in mutation order.
    save_turn: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
            state_path: None,
            fs: Arc::new(RealFs),
            save_turn: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_state_path(mut self, path: Option<PathBuf>) -> Self {
        self.state_path = path;
        self
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Capture the session's expansion state while the caller still holds
    /// the session lock. The write happens later, outside the lock.
    async fn prepare_save(&self, session: &Session) -> Option<PendingSave> {
        let path = self.state_path.clone()?;
        let turn = Arc::clone(&self.save_turn).lock_owned().await;
        Some(PendingSave {
            snapshot: session.snapshot(),
            path,
            fs: Arc::clone(&self.fs),
            _turn: turn,
        })
    }
}

struct PendingSave {
    snapshot: ExpansionSnapshot,
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    _turn: OwnedMutexGuard<()>,
}

impl PendingSave {
    async fn write(self) {
        let PendingSave {
            snapshot,
            path,
            fs,
            _turn,
        } = self;
        let target = path.clone();
        let result =
            tokio::task::spawn_blocking(move || save_snapshot(&*fs, &snapshot, &target))
                .await;
        match result {
            Ok(Ok(())) => tracing::debug!(path = %path.display(), "saved expansion state"),
            Ok(Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to save expansion state")
            }
            Err(e) => tracing::error!(error = %e, "expansion state writer did not finish"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub open_browser: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionState {
    pub expanded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedFlag {
    pub id: String,
    pub expanded: bool,
}

/// Error body in the `{"detail": ...}` form the viewer expects.
#[derive(Debug)]
pub enum ApiError {
    NodeNotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NodeNotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "detail": format!("Node '{}' not found", id) })),
            )
                .into_response(),
        }
    }
}

/// Build the router without binding a socket.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/graph/initial", get(initial_graph_handler))
        .route("/api/expand/{*id}", post(expand_handler))
        .route("/api/collapse/{*id}", post(collapse_handler))
        .route("/api/toggle/{*id}", post(toggle_handler))
        .route("/api/node/{*id}", get(node_handler))
        .route("/api/expanded/{*id}", get(expanded_handler))
        .route("/api/state", get(get_state_handler).put(put_state_handler))
        .route("/api/model/summary", get(summary_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until Ctrl+C.
pub async fn serve(
    state: Arc<AppState>,
    options: ServeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = state.session.read().await.name().to_string();
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let url = format!("http://{}", listener.local_addr()?);

    tracing::info!(%model, %addr, "visualization server listening");
    style::header(&format!("Serving {}", model));
    println!("Open in browser: {}", style::url(&url));
    println!("Press Ctrl+C to stop");

    if options.open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn graph_handler(State(state): State<Arc<AppState>>) -> Json<GraphView> {
    Json(state.session.read().await.full_view())
}

async fn initial_graph_handler(State(state): State<Arc<AppState>>) -> Json<GraphView> {
    Json(state.session.read().await.initial_view())
}

async fn expand_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<GraphView> {
    mutate(&state, |session| session.expand(&id)).await
}

async fn collapse_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<GraphView> {
    mutate(&state, |session| session.collapse(&id)).await
}

async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<GraphView> {
    mutate(&state, |session| session.toggle(&id)).await
}

async fn mutate<F>(state: &AppState, op: F) -> Json<GraphView>
where
    F: FnOnce(&mut Session) -> GraphView,
{
    let (view, pending) = {
        let mut session = state.session.write().await;
        let before = session.expansion_state();
        let view = op(&mut *session);
        let pending = if session.expansion_state() != before {
            state.prepare_save(&session).await
        } else {
            None
        };
        (view, pending)
    };
    if let Some(pending) = pending {
        pending.write().await;
    }
    Json(view)
}

async fn node_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<NodeDetail>, ApiError> {
    state
        .session
        .read()
        .await
        .node_details(&id)
        .map(Json)
        .ok_or(ApiError::NodeNotFound(id))
}

async fn expanded_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<ExpandedFlag> {
    let expanded = state.session.read().await.is_expanded(&id);
    Json(ExpandedFlag { id, expanded })
}

async fn get_state_handler(State(state): State<Arc<AppState>>) -> Json<ExpansionState> {
    Json(ExpansionState {
        expanded: state.session.read().await.expansion_state(),
    })
}

async fn put_state_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExpansionState>,
) -> Json<ExpansionState> {
    let (current, pending) = {
        let mut session = state.session.write().await;
        session.set_expansion_state(body.expanded);
        let current = ExpansionState {
            expanded: session.expansion_state(),
        };
        (current, state.prepare_save(&session).await)
    };
    if let Some(pending) = pending {
        pending.write().await;
    }
    Json(current)
}

async fn summary_handler(State(state): State<Arc<AppState>>) -> Json<ModelSummary> {
    Json(state.session.read().await.summary())
}
