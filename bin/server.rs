// Demo Trio - Web Server
// JSON API for the three demos plus the static page and CSV dataset

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::Parser;
use demo_trio::{
    init_logging, load_or_empty, validate_email, BossEstimate, BossOdds, CategoryModel,
    DemoConfig, FightQuery, LinkedList, LogFallback, ScoringPolicy, ANIMALS, FRUITS, SUITS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

/// Serve the demos over HTTP.
#[derive(Debug, Parser)]
#[command(name = "demo-server", version)]
struct Args {
    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the game history CSV location.
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Override the listen address.
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

/// Shared application state, read-only after startup
#[derive(Clone)]
struct AppState {
    odds: Arc<BossOdds>,
    default_query: FightQuery,
    default_policy: ScoringPolicy,
    /// Data file name shown in the no-data message
    source: String,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

#[derive(Deserialize)]
struct EmailRequest {
    email: String,
}

#[derive(Serialize)]
struct EmailResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// List edits are stateless: the caller sends the current values and gets the
/// edited values back.
#[derive(Deserialize)]
struct ListRequest {
    #[serde(default)]
    values: Vec<i64>,
    op: ListOp,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum ListOp {
    Append(i64),
    RemoveGreaterThan(i64),
}

#[derive(Serialize)]
struct ListResponse {
    values: Vec<i64>,
    len: usize,
}

#[derive(Deserialize)]
struct ProbabilityParams {
    suit: Option<String>,
    animal: Option<String>,
    fruit: Option<String>,
    policy: Option<ScoringPolicy>,
}

#[derive(Serialize)]
struct DomainsResponse {
    suits: [&'static str; 5],
    animals: [&'static str; 5],
    fruits: [&'static str; 5],
    defaults: FightQuery,
    default_policy: ScoringPolicy,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/email/validate - Run the email heuristic
async fn check_email(Json(req): Json<EmailRequest>) -> impl IntoResponse {
    let error = validate_email(&req.email);
    Json(ApiResponse::ok(EmailResponse {
        valid: error.is_none(),
        error: error.map(|e| e.to_string()),
    }))
}

/// POST /api/list - Apply one edit to a list
async fn edit_list(Json(req): Json<ListRequest>) -> impl IntoResponse {
    let mut list: LinkedList<i64> = req.values.into_iter().collect();

    match req.op {
        ListOp::Append(value) => list.append(value),
        ListOp::RemoveGreaterThan(threshold) => list.remove_greater_than(&threshold),
    }

    Json(ApiResponse::ok(ListResponse {
        len: list.len(),
        values: list.to_vec(),
    }))
}

/// GET /api/boss/probability - Win probability for a set of picks
async fn boss_probability(
    State(state): State<AppState>,
    Query(params): Query<ProbabilityParams>,
) -> impl IntoResponse {
    let mut query = state.default_query.clone();
    if let Some(suit) = params.suit {
        query.suit = suit;
    }
    if let Some(animal) = params.animal {
        query.animal = animal;
    }
    if let Some(fruit) = params.fruit {
        query.fruit = fruit;
    }
    let policy = params.policy.unwrap_or(state.default_policy);

    match state.odds.estimate(&query, policy) {
        Some(estimate) => (StatusCode::OK, Json(ApiResponse::ok(Some(estimate)))).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::<Option<BossEstimate>>::err(
                None,
                format!("No data found in {}", state.source),
            )),
        )
            .into_response(),
    }
}

/// GET /api/boss/model - Raw win/loss counts
async fn boss_model(State(state): State<AppState>) -> Json<ApiResponse<CategoryModel>> {
    Json(ApiResponse::ok(state.odds.model().clone()))
}

/// GET /api/boss/domains - Values each selector offers
async fn boss_domains(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(DomainsResponse {
        suits: SUITS,
        animals: ANIMALS,
        fruits: FRUITS,
        defaults: state.default_query,
        default_policy: state.default_policy,
    }))
}

/// GET / - Serve index.html
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

fn router(state: AppState, data_dir: &Path) -> Router {
    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/email/validate", post(check_email))
        .route("/list", post(edit_list))
        .route("/boss/probability", get(boss_probability))
        .route("/boss/model", get(boss_model))
        .route("/boss/domains", get(boss_domains))
        .with_state(state);

    // Build main router
    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/data", ServeDir::new(data_dir))
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = DemoConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(data) = args.data {
        config.data_path = data;
    }
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }

    let _guard = init_logging(&config.logging, LogFallback::Stderr)?;

    println!("🌐 Demo Trio - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let odds = BossOdds::new(load_or_empty(&config.data_path));
    if odds.is_empty() {
        warn!(path = %config.data_path.display(), "starting without boss data");
    } else {
        println!("✓ Loaded {} fights from {:?}", odds.model().total, config.data_path);
    }

    let source = config
        .data_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.data_path.display().to_string());

    let state = AppState {
        odds: Arc::new(odds),
        default_query: config.query.clone(),
        default_policy: config.policy,
        source,
    };

    let data_dir = config
        .data_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let app = router(state, &data_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.addr))?;

    info!(addr = %config.server.addr, "server listening");
    println!("\n🚀 Server running on http://{}", config.server.addr);
    println!("   API: http://{}/api/boss/probability", config.server.addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Failed to start server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use demo_trio::FightRecord;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router(records: Vec<FightRecord>) -> Router {
        let state = AppState {
            odds: Arc::new(BossOdds::new(records)),
            default_query: FightQuery::default(),
            default_policy: ScoringPolicy::Multiplicative,
            source: "fights.csv".to_string(),
        };
        router(state, Path::new("data"))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(test_router(Vec::new()), get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_email_endpoint() {
        let app = test_router(Vec::new());

        let (_, body) = send(app.clone(), post_json("/api/email/validate", json!({"email": "ab@cd.com"}))).await;
        assert_eq!(body["data"]["valid"], true);
        assert!(body["data"].get("error").is_none());

        let (_, body) = send(app, post_json("/api/email/validate", json!({"email": ""}))).await;
        assert_eq!(body["data"]["valid"], false);
        assert_eq!(body["data"]["error"], "Email address is required.");
    }

    #[tokio::test]
    async fn test_list_endpoint() {
        let app = test_router(Vec::new());

        let request = post_json("/api/list", json!({"values": [5, 1, 9, 3], "op": {"remove_greater_than": 4}}));
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["values"], json!([1, 3]));
        assert_eq!(body["data"]["len"], 2);

        let request = post_json("/api/list", json!({"op": {"append": 7}}));
        let (_, body) = send(app, request).await;
        assert_eq!(body["data"]["values"], json!([7]));
    }

    #[tokio::test]
    async fn test_probability_endpoint() {
        let app = test_router(vec![FightRecord::new("Hearts", "Lion", "Mango", true)]);

        let (status, body) = send(app.clone(), get_request("/api/boss/probability")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["probability"], 1.0);
        assert_eq!(body["data"]["policy"], "multiplicative");
        assert_eq!(body["data"]["suit"]["total"], 1);

        let uri = "/api/boss/probability?suit=Joker&policy=field-average";
        let (_, body) = send(app, get_request(uri)).await;
        assert_eq!(body["data"]["query"]["suit"], "Joker");
        assert_eq!(body["data"]["policy"], "field-average");
    }

    #[tokio::test]
    async fn test_probability_without_data() {
        let (status, body) = send(test_router(Vec::new()), get_request("/api/boss/probability")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["success"], false);
        assert!(body["data"].is_null());
        assert_eq!(body["error"], "No data found in fights.csv");
    }

    #[tokio::test]
    async fn test_model_and_domains() {
        let records = vec![
            FightRecord::new("Hearts", "Lion", "Mango", true),
            FightRecord::new("Clubs", "Fox", "Apple", false),
        ];
        let app = test_router(records);

        let (_, body) = send(app.clone(), get_request("/api/boss/model")).await;
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["lose_suit"]["Clubs"], 1);

        let (_, body) = send(app, get_request("/api/boss/domains")).await;
        assert_eq!(body["data"]["suits"][4], "Joker");
        assert_eq!(body["data"]["defaults"]["suit"], "Hearts");
        assert_eq!(body["data"]["defaults"]["fruit"], "Mango");
        assert_eq!(body["data"]["default_policy"], "multiplicative");
    }
}
