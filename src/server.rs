use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::analysis::national::{resolve_assumptions, simulate};
use crate::analysis::sensitivity::sensitivity;
use crate::analysis::{RawAssumptions, SensitivityPoint, SimulationResult};
use crate::coefficients::CoefficientStore;
use crate::config::Config;
use crate::evaluation::evaluator::evaluate;
use crate::evaluation::Evaluation;
use crate::resolver::{resolve_config, Configuration, RawConfig};
use crate::scenario::{
    compare_scenarios, SavedScenario, ScenarioComparison, ScenarioError, ScenarioStore,
};

#[derive(Clone)]
struct ApiState {
    config: Arc<Config>,
    tables: Arc<CoefficientStore>,
    fingerprint: Arc<str>,
    scenarios: Arc<Mutex<ScenarioStore>>,
}

impl ApiState {
    fn resolve(&self, raw: RawConfig) -> Configuration {
        resolve_config(&raw.or(&self.config.scenario))
    }

    fn scenarios(&self) -> std::result::Result<MutexGuard<'_, ScenarioStore>, ApiError> {
        self.scenarios
            .lock()
            .map_err(|_| ApiError::internal("scenario store lock poisoned"))
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Debug, Serialize)]
struct ApiErrorBody {
    ok: bool,
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl From<ScenarioError> for ApiError {
    fn from(error: ScenarioError) -> Self {
        match error {
            ScenarioError::NotFound { .. } => Self::not_found(error.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorBody {
            ok: false,
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Debug, Clone, Default, Deserialize)]
struct SimulateRequest {
    #[serde(flatten)]
    scenario: RawConfig,
    #[serde(default)]
    assumptions: RawAssumptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SaveScenarioRequest {
    name: Option<String>,
    #[serde(flatten)]
    scenario: RawConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct CompareQuery {
    a: Option<usize>,
    b: Option<usize>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct CoefficientsResponse {
    fingerprint: String,
    tables: CoefficientStore,
}

#[derive(Debug, Serialize)]
struct EvaluateResponse {
    #[serde(flatten)]
    evaluation: Evaluation,
    tables_fingerprint: String,
}

#[derive(Debug, Serialize)]
struct SensitivityResponse {
    config: Configuration,
    points: Vec<SensitivityPoint>,
}

#[derive(Debug, Serialize)]
struct ScenarioListResponse {
    scenarios: Vec<SavedScenario>,
}

pub fn build_router(config: Config, tables: CoefficientStore) -> Router {
    let state = ApiState {
        fingerprint: Arc::from(tables.fingerprint()),
        config: Arc::new(config),
        tables: Arc::new(tables),
        scenarios: Arc::new(Mutex::new(ScenarioStore::new())),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/v1/coefficients", get(coefficients))
        .route("/v1/evaluate", post(evaluate_scenario))
        .route("/v1/sensitivity", post(run_sensitivity))
        .route("/v1/simulate", post(run_simulation))
        .route("/v1/scenarios", get(list_scenarios).post(save_scenario))
        .route("/v1/scenarios/compare", get(compare))
        .route("/v1/scenarios/:index", get(get_scenario))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(config: Config, tables: CoefficientStore, bind: SocketAddr) -> Result<()> {
    let app = build_router(config, tables);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("REST API listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<ApiResponse<HealthResponse>> {
    ok(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn coefficients(State(state): State<ApiState>) -> Json<ApiResponse<CoefficientsResponse>> {
    ok(CoefficientsResponse {
        fingerprint: state.fingerprint.to_string(),
        tables: state.tables.as_ref().clone(),
    })
}

async fn evaluate_scenario(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<RawConfig>, JsonRejection>,
) -> ApiResult<EvaluateResponse> {
    let Json(request) = payload?;
    let config = state.resolve(request);
    let evaluation = evaluate(&state.tables, &config);
    Ok(ok(EvaluateResponse {
        evaluation,
        tables_fingerprint: state.fingerprint.to_string(),
    }))
}

async fn run_sensitivity(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<RawConfig>, JsonRejection>,
) -> ApiResult<SensitivityResponse> {
    let Json(request) = payload?;
    let config = state.resolve(request);
    let points = sensitivity(&state.tables, &config).to_vec();
    Ok(ok(SensitivityResponse { config, points }))
}

async fn run_simulation(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<SimulateRequest>, JsonRejection>,
) -> ApiResult<SimulationResult> {
    let Json(request) = payload?;
    let config = state.resolve(request.scenario);
    let assumptions =
        resolve_assumptions(&request.assumptions.or(&state.config.simulation));
    let per_cohort = evaluate(&state.tables, &config).result;
    Ok(ok(simulate(&config, &per_cohort, &assumptions)))
}

async fn list_scenarios(State(state): State<ApiState>) -> ApiResult<ScenarioListResponse> {
    let scenarios = state.scenarios()?.list().to_vec();
    Ok(ok(ScenarioListResponse { scenarios }))
}

async fn save_scenario(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<SaveScenarioRequest>, JsonRejection>,
) -> ApiResult<SavedScenario> {
    let Json(request) = payload?;
    let config = state.resolve(request.scenario);
    let evaluation = evaluate(&state.tables, &config);
    let mut store = state.scenarios()?;
    let index = store.save(request.name.as_deref(), &evaluation);
    let saved = store.get(index)?.clone();
    Ok(ok(saved))
}

async fn get_scenario(
    State(state): State<ApiState>,
    index: std::result::Result<Path<usize>, PathRejection>,
) -> ApiResult<SavedScenario> {
    let Path(index) = index?;
    let store = state.scenarios()?;
    Ok(ok(store.get(index)?.clone()))
}

async fn compare(
    State(state): State<ApiState>,
    query: std::result::Result<Query<CompareQuery>, QueryRejection>,
) -> ApiResult<ScenarioComparison> {
    let Query(query) = query?;
    let (Some(a), Some(b)) = (query.a, query.b) else {
        return Err(ApiError::bad_request(
            "both `a` and `b` scenario indices are required",
        ));
    };
    debug!("comparing scenarios {a} and {b}");
    let store = state.scenarios()?;
    Ok(ok(compare_scenarios(&store, a, b)?))
}

fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse { ok: true, data })
}
