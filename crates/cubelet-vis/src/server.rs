//! Axum web server with WebSocket control for the puzzle view.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use axum::{
    extract::{State, ws::{WebSocket, WebSocketUpgrade, Message}},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use cubelet_core::{Cubie, Move};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::autoplay::{spawn_autoplay, AutoplayOutcome};
use crate::error::Error;
use crate::events::{CubeEvent, CubeSnapshot};
use crate::input::InputAction;
use crate::playback::PlaybackStatus;
use crate::session::{self, Session};
use crate::solver::SolutionProvider;

/// Shared application state.
pub struct AppState {
    session: Arc<RwLock<Session>>,
    provider: Arc<dyn SolutionProvider>,
    autoplay: Mutex<Option<JoinHandle<AutoplayOutcome>>>,
}

impl AppState {
    async fn start_autoplay(&self) -> Result<(), Error> {
        let interval = self.session.read().await.config().autoplay_interval;
        let handle = spawn_autoplay(self.session.clone(), interval).await?;
        if let Some(old) = self.autoplay.lock().await.replace(handle) {
            old.abort();
        }
        Ok(())
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Create a server around a session and a solution provider.
    pub fn new(session: Session, provider: Arc<dyn SolutionProvider>) -> Self {
        Self {
            state: Arc::new(AppState {
                session: Arc::new(RwLock::new(session)),
                provider,
                autoplay: Mutex::new(None),
            }),
        }
    }

    /// Shared handle to the session.
    pub fn session(&self) -> Arc<RwLock<Session>> {
        self.state.session.clone()
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/snapshot", get(snapshot_handler))
            .route("/api/cubies", get(cubies_handler))
            .route("/api/events", get(events_handler))
            .route("/api/move", post(move_handler))
            .route("/api/scramble", post(scramble_handler))
            .route("/api/reset", post(reset_handler))
            .route("/api/key", post(key_handler))
            .route("/api/solve", post(solve_handler))
            .route("/api/solve/abandon", post(abandon_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/next", post(next_handler))
            .route("/api/playback/previous", post(previous_handler))
            .route("/api/playback/reset", post(playback_reset_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/stop", post(stop_handler))
            // WebSocket for the live view
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> Result<(), std::io::Error> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Puzzle server running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await
    }
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Stale | Error::Corrupted | Error::NoSolution => StatusCode::CONFLICT,
        Error::InvalidState(_) | Error::Core(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::SolutionUnavailable(_) | Error::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: Error) -> ApiError {
    (
        status_for(&err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Server status response.
#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    generation: u64,
    solved: bool,
    solving: bool,
    corrupted: bool,
    event_count: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let s = state.session.read().await;
    Json(StatusResponse {
        status: "ok",
        generation: s.generation(),
        solved: s.state().is_solved(),
        solving: s.is_solving(),
        corrupted: s.is_corrupted(),
        event_count: s.next_frame() as usize,
    })
}

async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Json<CubeSnapshot> {
    Json(state.session.read().await.snapshot())
}

async fn cubies_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Cubie>> {
    Json(state.session.read().await.cubies())
}

#[derive(Deserialize)]
struct EventsQuery {
    #[serde(default)]
    since: u64,
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
    axum::extract::Query(query): axum::extract::Query<EventsQuery>,
) -> Json<Vec<CubeEvent>> {
    Json(state.session.read().await.events_since(query.since))
}

#[derive(Deserialize)]
struct MoveRequest {
    #[serde(rename = "move")]
    mv: String,
}

async fn move_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<CubeSnapshot>, ApiError> {
    let mut s = state.session.write().await;
    s.apply_notation(&req.mv).map_err(api_error)?;
    Ok(Json(s.snapshot()))
}

/// Scramble response: the sequence used and the resulting view.
#[derive(Debug, Serialize)]
struct ScrambleResponse {
    sequence: Vec<Move>,
    fell_back: bool,
    snapshot: CubeSnapshot,
}

async fn scramble_handler(State(state): State<Arc<AppState>>) -> Json<ScrambleResponse> {
    let mut s = state.session.write().await;
    let result = s.scramble();
    Json(ScrambleResponse {
        sequence: result.moves,
        fell_back: result.fell_back,
        snapshot: s.snapshot(),
    })
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<CubeSnapshot> {
    let mut s = state.session.write().await;
    s.reset();
    Json(s.snapshot())
}

#[derive(Deserialize)]
struct KeyRequest {
    key: String,
    #[serde(default)]
    shift: bool,
}

#[derive(Debug, Serialize)]
struct KeyResponse {
    action: Option<InputAction>,
    snapshot: CubeSnapshot,
}

async fn key_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KeyRequest>,
) -> Result<Json<KeyResponse>, ApiError> {
    let mut s = state.session.write().await;
    let action = s.handle_input(&req.key, req.shift).map_err(api_error)?;
    Ok(Json(KeyResponse {
        action,
        snapshot: s.snapshot(),
    }))
}

#[derive(Debug, Serialize)]
struct SolveResponse {
    total_moves: usize,
    playback: Option<PlaybackStatus>,
}

async fn solve_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SolveResponse>, ApiError> {
    let total_moves = session::solve(&state.session, state.provider.as_ref())
        .await
        .map_err(api_error)?;
    let s = state.session.read().await;
    Ok(Json(SolveResponse {
        total_moves,
        playback: s.playback_status(),
    }))
}

#[derive(Debug, Serialize)]
struct AbandonResponse {
    abandoned: bool,
}

async fn abandon_handler(State(state): State<Arc<AppState>>) -> Json<AbandonResponse> {
    let abandoned = state.session.write().await.abandon_solve();
    Json(AbandonResponse { abandoned })
}

async fn playback_status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlaybackStatus>, ApiError> {
    let s = state.session.read().await;
    s.playback_status()
        .map(Json)
        .ok_or_else(|| api_error(Error::NoSolution))
}

async fn next_handler(State(state): State<Arc<AppState>>) -> Result<Json<CubeSnapshot>, ApiError> {
    let mut s = state.session.write().await;
    s.next_step().map_err(api_error)?;
    Ok(Json(s.snapshot()))
}

async fn previous_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CubeSnapshot>, ApiError> {
    let mut s = state.session.write().await;
    s.previous_step().map_err(api_error)?;
    Ok(Json(s.snapshot()))
}

async fn playback_reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CubeSnapshot>, ApiError> {
    let mut s = state.session.write().await;
    s.reset_playback().map_err(api_error)?;
    Ok(Json(s.snapshot()))
}

async fn play_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlaybackStatus>, ApiError> {
    state.start_autoplay().await.map_err(api_error)?;
    let s = state.session.read().await;
    s.playback_status()
        .map(Json)
        .ok_or_else(|| api_error(Error::NoSolution))
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<CubeSnapshot> {
    let mut s = state.session.write().await;
    s.stop_autoplay();
    Json(s.snapshot())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    // Send the current view first
    let snapshot = state.session.read().await.snapshot();
    if let Ok(json) = serde_json::to_string(&WsResponse::Snapshot(snapshot)) {
        let _ = socket.send(Message::Text(json.into())).await;
    }

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let response = match serde_json::from_str::<WsCommand>(&text) {
                    Ok(cmd) => handle_ws_command(&state, cmd).await,
                    Err(e) => WsResponse::Error {
                        message: format!("unrecognized command: {e}"),
                    },
                };
                if let Ok(json) = serde_json::to_string(&response) {
                    let _ = socket.send(Message::Text(json.into())).await;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum WsCommand {
    #[serde(rename = "get_snapshot")]
    GetSnapshot,
    #[serde(rename = "get_status")]
    GetStatus,
    #[serde(rename = "move")]
    Move {
        #[serde(rename = "move")]
        mv: String,
    },
    #[serde(rename = "key")]
    Key {
        key: String,
        #[serde(default)]
        shift: bool,
    },
    #[serde(rename = "scramble")]
    Scramble,
    #[serde(rename = "reset")]
    Reset,
    #[serde(rename = "next")]
    Next,
    #[serde(rename = "previous")]
    Previous,
    #[serde(rename = "playback_reset")]
    PlaybackReset,
    #[serde(rename = "play")]
    Play,
    #[serde(rename = "stop")]
    Stop,
    #[serde(rename = "solve")]
    Solve,
    #[serde(rename = "abandon")]
    Abandon,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum WsResponse {
    #[serde(rename = "snapshot")]
    Snapshot(CubeSnapshot),
    #[serde(rename = "status")]
    Status(PlaybackStatus),
    #[serde(rename = "error")]
    Error { message: String },
}

impl From<Error> for WsResponse {
    fn from(e: Error) -> Self {
        WsResponse::Error {
            message: e.to_string(),
        }
    }
}

async fn handle_ws_command(state: &Arc<AppState>, cmd: WsCommand) -> WsResponse {
    match cmd {
        WsCommand::GetSnapshot => WsResponse::Snapshot(state.session.read().await.snapshot()),
        WsCommand::GetStatus => match state.session.read().await.playback_status() {
            Some(status) => WsResponse::Status(status),
            None => Error::NoSolution.into(),
        },
        WsCommand::Play => {
            if let Err(e) = state.start_autoplay().await {
                return e.into();
            }
            match state.session.read().await.playback_status() {
                Some(status) => WsResponse::Status(status),
                None => Error::NoSolution.into(),
            }
        }
        // The provider runs without the session lock held
        WsCommand::Solve => match session::solve(&state.session, state.provider.as_ref()).await {
            Ok(_) => WsResponse::Snapshot(state.session.read().await.snapshot()),
            Err(e) => e.into(),
        },
        cmd => {
            let mut s = state.session.write().await;
            let result = match cmd {
                WsCommand::Move { mv } => s.apply_notation(&mv).map(drop),
                WsCommand::Key { key, shift } => s.handle_input(&key, shift).map(drop),
                WsCommand::Scramble => {
                    s.scramble();
                    Ok(())
                }
                WsCommand::Reset => {
                    s.reset();
                    Ok(())
                }
                WsCommand::Next => s.next_step().map(drop),
                WsCommand::Previous => s.previous_step().map(drop),
                WsCommand::PlaybackReset => s.reset_playback(),
                WsCommand::Stop => {
                    s.stop_autoplay();
                    Ok(())
                }
                WsCommand::Abandon => {
                    s.abandon_solve();
                    Ok(())
                }
                WsCommand::GetSnapshot
                | WsCommand::GetStatus
                | WsCommand::Play
                | WsCommand::Solve => Ok(()),
            };
            match result {
                Ok(()) => WsResponse::Snapshot(s.snapshot()),
                Err(e) => e.into(),
            }
        }
    }
}
