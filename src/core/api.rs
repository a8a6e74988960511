//! HTTP API for speedlog
//!
//! Endpoints (all `/api` routes need the user header):
//! - GET    /health                   - Health check
//! - GET    /api/scramble             - New scramble (?length=N)
//! - POST   /api/solve                - Log a solve
//! - DELETE /api/delete_solve/:index  - Delete one solve (?id=N guards against shifts)
//! - POST   /api/delete_selected      - Delete several solves
//! - DELETE /api/delete_all           - Delete every solve
//! - PATCH  /api/penalty/:index       - Set DNF / +2 on a solve
//! - GET    /api/stats                - Statistics snapshot + raw log
//! - POST   /api/cube/validate        - Validate / encode a cube
//! - POST   /api/cube/solve           - Solve a cube
//!
//! Malformed bodies, paths and query strings come back through `AppError`
//! as 400 with the usual JSON error body.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequestParts, Path, Query, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::core::{
    solve, CommandOracle, CubeStateCodec, OfflineOracle, ScrambleGenerator, SolveRequest,
    SolveStore, SolvingOracle, StatisticsEngine,
};
use crate::types::{
    FaceLayout, IndexError, OracleError, SolveError, SolveRecord, SolveSubmission,
    StatisticsSnapshot, ValidationError,
};
use crate::{DEFAULT_SCRAMBLE_LENGTH, DEFAULT_SOLVER_TIMEOUT_MS, MAX_SCRAMBLE_LENGTH};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub addr: String,
    /// External solver command line; `None` runs without a solver
    pub solver_command: Option<String>,
    /// Boundary timeout for one solver call
    pub solver_timeout: Duration,
    /// Header carrying the authenticated user id
    pub user_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            solver_command: None,
            solver_timeout: Duration::from_millis(DEFAULT_SOLVER_TIMEOUT_MS),
            user_header: "x-user-id".to_string(),
        }
    }
}

impl ServerConfig {
    /// Oracle selected by this configuration
    pub fn oracle(&self) -> Arc<dyn SolvingOracle> {
        match self.solver_command.as_deref().and_then(CommandOracle::from_command_line) {
            Some(oracle) => Arc::new(oracle.with_timeout(self.solver_timeout)),
            None => Arc::new(OfflineOracle),
        }
    }
}

/// App state
pub struct AppState {
    pub store: SolveStore,
    pub engine: StatisticsEngine,
    pub codec: CubeStateCodec,
    pub oracle: Arc<dyn SolvingOracle>,
    pub solver_timeout: Duration,
    pub user_header: String,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing user identity")]
    Unauthenticated,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<SolveError> for AppError {
    fn from(err: SolveError) -> Self {
        match err {
            SolveError::Validation(e) => AppError::Validation(e),
            SolveError::Oracle(e) => AppError::Oracle(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated", self.to_string()),
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.kind(), e.to_string()),
            AppError::Index(_) => (StatusCode::BAD_REQUEST, "index", self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Oracle(e @ OracleError::Unavailable(_)) => {
                warn!("Solver unavailable: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, e.kind(), e.user_message().to_string())
            }
            AppError::Oracle(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.kind(), e.user_message().to_string()),
        };

        let body = json!({
            "success": false,
            "kind": kind,
            "error": message,
            "detail": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// IDENTITY
// =============================================================================

/// Authenticated user id, taken from the configured header
#[derive(Debug, Clone)]
pub struct User(pub String);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(state.user_header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| User(id.to_string()))
            .ok_or(AppError::Unauthenticated)
    }
}

// =============================================================================
// REQUESTS / RESPONSES
// =============================================================================

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub users: usize,
}

#[derive(Debug, Deserialize)]
pub struct ScrambleQuery {
    pub length: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ScrambleResponse {
    pub scramble: String,
}

#[derive(Debug, Serialize)]
pub struct AddSolveResponse {
    pub success: bool,
    pub index: usize,
    pub id: u64,
    pub evicted: bool,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    /// Id of the solve the caller saw at this index
    pub id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSelectedRequest {
    pub indices: Vec<usize>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub success: bool,
    pub removed: usize,
}

#[derive(Debug, Deserialize)]
pub struct PenaltyRequest {
    #[serde(default, alias = "dnf")]
    pub is_dnf: bool,
    #[serde(default, alias = "plus2")]
    pub has_plus_two: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: StatisticsSnapshot,
    pub solves: Vec<SolveRecord>,
}

/// Cube input: a raw string or a color layout
#[derive(Debug, Deserialize)]
pub struct CubeInput {
    pub cube: Option<String>,
    pub cube_state: Option<FaceLayout>,
}

impl CubeInput {
    fn into_request(self) -> AppResult<SolveRequest> {
        match (self.cube, self.cube_state) {
            (Some(raw), None) => Ok(SolveRequest::Facelets(raw)),
            (None, Some(layout)) => Ok(SolveRequest::Layout(layout)),
            (Some(_), Some(_)) => Err(AppError::BadRequest("send either cube or cube_state, not both".into())),
            (None, None) => Err(AppError::BadRequest("missing cube or cube_state".into())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub cube: String,
}

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub success: bool,
    pub solution: String,
    pub move_count: usize,
}

// =============================================================================
// ROUTER
// =============================================================================

/// Create the API router with the oracle chosen by `config`
pub fn create_router(config: &ServerConfig) -> Router {
    create_router_with_oracle(config, config.oracle())
}

/// Create the API router with an explicit oracle
pub fn create_router_with_oracle(config: &ServerConfig, oracle: Arc<dyn SolvingOracle>) -> Router {
    let state = Arc::new(AppState {
        store: SolveStore::new(),
        engine: StatisticsEngine::new(),
        codec: CubeStateCodec::new(),
        oracle,
        solver_timeout: config.solver_timeout,
        user_header: config.user_header.to_ascii_lowercase(),
    });

    Router::new()
        .route("/health", get(health))
        .route("/api/scramble", get(scramble))
        .route("/api/solve", post(add_solve))
        .route("/api/delete_solve/:index", delete(delete_solve))
        .route("/api/delete_selected", post(delete_selected))
        .route("/api/delete_all", delete(delete_all))
        .route("/api/penalty/:index", patch(set_penalty))
        .route("/api/stats", get(stats))
        .route("/api/cube/validate", post(validate_cube))
        .route("/api/cube/solve", post(solve_cube))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        users: state.store.user_count().await,
    })
}

async fn scramble(
    _user: User,
    query: Result<Query<ScrambleQuery>, QueryRejection>,
) -> AppResult<Json<ScrambleResponse>> {
    let Query(query) = query?;
    let length = query.length.unwrap_or(DEFAULT_SCRAMBLE_LENGTH);
    if length == 0 || length > MAX_SCRAMBLE_LENGTH {
        return Err(AppError::BadRequest(format!(
            "length must be between 1 and {}",
            MAX_SCRAMBLE_LENGTH
        )));
    }
    Ok(Json(ScrambleResponse {
        scramble: ScrambleGenerator::new().generate(length),
    }))
}

/// Log a solve
async fn add_solve(
    State(state): State<Arc<AppState>>,
    User(user): User,
    submission: Result<Json<SolveSubmission>, JsonRejection>,
) -> AppResult<Json<AddSolveResponse>> {
    let Json(submission) = submission?;
    let record = submission.into_record()?;
    let appended = state.store.append(&user, record).await;

    if appended.evicted() {
        info!("Solve logged for {} at #{} ({} evicted)", user, appended.index, appended.evicted_count);
    } else {
        info!("Solve logged for {} at #{}", user, appended.index);
    }

    Ok(Json(AddSolveResponse {
        success: true,
        index: appended.index,
        id: appended.id,
        evicted: appended.evicted(),
    }))
}

async fn delete_solve(
    State(state): State<Arc<AppState>>,
    User(user): User,
    index: Result<Path<usize>, PathRejection>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Path(index) = index?;
    let Query(query) = query?;
    let removed = state.store.delete_at(&user, index, query.id).await?;
    info!("Deleted solve #{} (id {}) for {}", index, removed.id(), user);
    Ok(Json(SuccessResponse { success: true }))
}

async fn delete_selected(
    State(state): State<Arc<AppState>>,
    User(user): User,
    req: Result<Json<DeleteSelectedRequest>, JsonRejection>,
) -> AppResult<Json<RemovedResponse>> {
    let Json(req) = req?;
    let removed = state.store.delete_many(&user, &req.indices).await?;
    info!("Deleted {} selected solves for {}", removed, user);
    Ok(Json(RemovedResponse { success: true, removed }))
}

async fn delete_all(State(state): State<Arc<AppState>>, User(user): User) -> Json<RemovedResponse> {
    let removed = state.store.clear(&user).await;
    info!("Deleted all {} solves for {}", removed, user);
    Json(RemovedResponse { success: true, removed })
}

async fn set_penalty(
    State(state): State<Arc<AppState>>,
    User(user): User,
    index: Result<Path<usize>, PathRejection>,
    req: Result<Json<PenaltyRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Path(index) = index?;
    let Json(req) = req?;
    state
        .store
        .set_penalty(&user, index, req.is_dnf, req.has_plus_two)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Statistics + raw log; never fails for a known user
async fn stats(State(state): State<Arc<AppState>>, User(user): User) -> Json<StatsResponse> {
    let solves = state.store.snapshot(&user).await;
    let stats = state.engine.compute(&solves);
    Json(StatsResponse { stats, solves })
}

async fn validate_cube(
    State(state): State<Arc<AppState>>,
    _user: User,
    input: Result<Json<CubeInput>, JsonRejection>,
) -> AppResult<Json<ValidateResponse>> {
    let Json(input) = input?;
    let cube = input.into_request()?.canonicalize(&state.codec)?;
    Ok(Json(ValidateResponse {
        success: true,
        cube: cube.to_string(),
    }))
}

async fn solve_cube(
    State(state): State<Arc<AppState>>,
    _user: User,
    input: Result<Json<CubeInput>, JsonRejection>,
) -> AppResult<Json<SolveResponse>> {
    let Json(input) = input?;
    let request = input.into_request()?;
    let outcome = solve(&request, &state.codec, state.oracle.clone(), state.solver_timeout).await?;
    Ok(Json(SolveResponse {
        success: true,
        solution: outcome.solution,
        move_count: outcome.move_count,
    }))
}

/// Run the API server
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let oracle = config.oracle();
    info!("Solver: {}", oracle.name());
    let router = create_router_with_oracle(&config, oracle);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    info!("Speedlog API running on {}", config.addr);
    axum::serve(listener, router).await?;
    Ok(())
}
