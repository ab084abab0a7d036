// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bidline_api::{
    ApiError, BacklogQuery, BidInfo, BulkDeleteRequest, BulkDeleteResponse, CreateBidRequest,
    DeleteBidResponse, ListBidsQuery, MetricsQuery, PipelineConfig, TransitionBidRequest,
    UpdateBidRequest, VisibilityPreset, bulk_delete_bids, create_bid, delete_bid, get_backlog,
    get_bid, get_metrics, list_bids, transition_bid, update_bid,
};
use bidline_domain::{BacklogKind, EffectiveThresholds, Page, PipelineMetrics, now_millis};
use bidline_persistence::Persistence;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::Caller;

/// Bidline Server - HTTP server for the bid pipeline
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Which roles see every bid in their organization
    #[arg(long, default_value = "pipeline-manager-only")]
    visibility: VisibilityPreset,

    /// Grants org-wide visibility to a role; repeatable, replaces the preset
    #[arg(long = "org-wide-role", value_name = "ROLE")]
    org_wide_roles: Vec<String>,

    /// Default days before a draft counts as aging
    #[arg(long, default_value_t = 7)]
    draft_aging_days: u32,

    /// Default days after a status change before a follow-up is due
    #[arg(long, default_value_t = 3)]
    follow_up_sla_days: u32,

    /// Default days of silence before suggesting a bid is ghosted
    #[arg(long, default_value_t = 14)]
    ghosted_suggest_days: u32,
}

impl Args {
    fn pipeline_config(&self) -> Result<PipelineConfig, bidline_api::ConfigError> {
        PipelineConfig::from_parts(
            self.visibility,
            &self.org_wide_roles,
            EffectiveThresholds {
                draft_aging_days: self.draft_aging_days,
                follow_up_sla_days: self.follow_up_sla_days,
                ghosted_suggest_days: self.ghosted_suggest_days,
            },
        )
    }
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex; each request holds it for
/// the whole of its read-modify-write.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    config: Arc<PipelineConfig>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } | ApiError::MissingRequiredField { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::TerminalStateImmutable { .. } | ApiError::Conflict { .. } => {
                StatusCode::CONFLICT
            }
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => {
                error!(error = %err, "Request failed with an internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/bids`.
async fn handle_create_bid(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Json(req): Json<CreateBidRequest>,
) -> Result<(StatusCode, Json<BidInfo>), HttpError> {
    info!(
        user_id = user.user_id,
        organization_id = req.organization_id,
        "Handling create_bid request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let bid: BidInfo = create_bid(&mut persistence, &user, &req, now_millis())?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(bid)))
}

/// Handler for GET `/bids`.
async fn handle_list_bids(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Query(query): Query<ListBidsQuery>,
) -> Result<Json<Page<BidInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: Page<BidInfo> = list_bids(
        &mut persistence,
        &app_state.config,
        &user,
        &query,
        now_millis(),
    )?;
    Ok(Json(page))
}

/// Handler for GET `/bids/{bid_id}`.
async fn handle_get_bid(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(bid_id): Path<i64>,
) -> Result<Json<BidInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let bid: BidInfo = get_bid(&mut persistence, &app_state.config, &user, bid_id)?;
    Ok(Json(bid))
}

/// Handler for PATCH `/bids/{bid_id}`.
async fn handle_update_bid(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(bid_id): Path<i64>,
    Json(req): Json<UpdateBidRequest>,
) -> Result<Json<BidInfo>, HttpError> {
    info!(user_id = user.user_id, bid_id, "Handling update_bid request");

    let mut persistence = app_state.persistence.lock().await;
    let bid: BidInfo = update_bid(
        &mut persistence,
        &app_state.config,
        &user,
        bid_id,
        &req,
        now_millis(),
    )?;
    Ok(Json(bid))
}

/// Handler for POST `/bids/{bid_id}/transition`.
async fn handle_transition_bid(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(bid_id): Path<i64>,
    Json(req): Json<TransitionBidRequest>,
) -> Result<Json<BidInfo>, HttpError> {
    info!(
        user_id = user.user_id,
        bid_id,
        target = %req.status,
        "Handling transition_bid request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let bid: BidInfo = transition_bid(
        &mut persistence,
        &app_state.config,
        &user,
        bid_id,
        &req,
        now_millis(),
    )?;
    Ok(Json(bid))
}

/// Handler for DELETE `/bids/{bid_id}`.
async fn handle_delete_bid(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(bid_id): Path<i64>,
) -> Result<Json<DeleteBidResponse>, HttpError> {
    info!(user_id = user.user_id, bid_id, "Handling delete_bid request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteBidResponse =
        delete_bid(&mut persistence, &app_state.config, &user, bid_id)?;
    Ok(Json(response))
}

/// Handler for POST `/bids/bulk-delete`.
async fn handle_bulk_delete(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Json(req): Json<BulkDeleteRequest>,
) -> Result<Json<BulkDeleteResponse>, HttpError> {
    info!(
        user_id = user.user_id,
        count = req.ids.len(),
        "Handling bulk_delete request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: BulkDeleteResponse = bulk_delete_bids(
        &mut persistence,
        &app_state.config,
        &user,
        &req,
        now_millis(),
    )?;
    Ok(Json(response))
}

/// Handler for GET `/bids/backlog/{kind}`.
async fn handle_get_backlog(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Path(slug): Path<String>,
    Query(query): Query<BacklogQuery>,
) -> Result<Json<Page<BidInfo>>, HttpError> {
    let kind: BacklogKind = BacklogKind::ALL
        .into_iter()
        .find(|k| k.as_str() == slug)
        .ok_or_else(|| HttpError {
            status: StatusCode::NOT_FOUND,
            message: format!("Unknown backlog '{slug}'"),
        })?;

    let mut persistence = app_state.persistence.lock().await;
    let page: Page<BidInfo> = get_backlog(
        &mut persistence,
        &app_state.config,
        &user,
        kind,
        &query,
        now_millis(),
    )?;
    Ok(Json(page))
}

/// Handler for GET `/bids/metrics`. Always answers 200.
async fn handle_get_metrics(
    State(app_state): State<AppState>,
    Caller(user): Caller,
    Query(query): Query<MetricsQuery>,
) -> Json<PipelineMetrics> {
    let mut persistence = app_state.persistence.lock().await;
    Json(get_metrics(
        &mut persistence,
        &app_state.config,
        &user,
        &query,
        now_millis(),
    ))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/bids", post(handle_create_bid).get(handle_list_bids))
        .route("/bids/bulk-delete", post(handle_bulk_delete))
        .route("/bids/metrics", get(handle_get_metrics))
        .route("/bids/backlog/{kind}", get(handle_get_backlog))
        .route(
            "/bids/{bid_id}",
            get(handle_get_bid)
                .patch(handle_update_bid)
                .delete(handle_delete_bid),
        )
        .route("/bids/{bid_id}/transition", post(handle_transition_bid))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Bidline Server");

    let config: PipelineConfig = args.pipeline_config()?;
    info!(
        org_wide_roles = ?config.visibility.org_wide_roles(),
        thresholds = ?config.default_thresholds,
        "Loaded pipeline configuration"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        config: Arc::new(config),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use bidline_domain::MemberRole;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const OWNER: i64 = 1;
    const MEMBER: i64 = 2;
    const MANAGER: i64 = 3;
    const OUTSIDER: i64 = 4;

    /// Creates app state with one organization and returns its id.
    fn create_test_app_state() -> (AppState, i64) {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let now = now_millis();
        let org: i64 = persistence
            .create_organization("Acme Consulting", OWNER, now)
            .unwrap();
        persistence
            .add_member(org, MEMBER, MemberRole::Member, now)
            .unwrap();
        persistence
            .add_member(org, MANAGER, MemberRole::PipelineManager, now)
            .unwrap();

        let app_state = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            config: Arc::new(PipelineConfig::default()),
        };
        (app_state, org)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        user: Option<i64>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create(app: &Router, user: i64, org: i64, title: &str) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/bids",
            Some(user),
            Some(json!({
                "organizationId": org,
                "platform": "UPWORK",
                "title": title
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_missing_caller_is_unauthorized() {
        let (app_state, _org) = create_test_app_state();
        let app: Router = build_router(app_state);

        let (status, body) = send(&app, "GET", "/bids", None, None).await;
        assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], json!(true));

        let request = Request::builder()
            .uri("/bids/metrics")
            .header("x-user-id", "not-a-number")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_and_get_bid() {
        let (app_state, org) = create_test_app_state();
        let app: Router = build_router(app_state);

        let bid_id = create(&app, MEMBER, org, "Marketplace rebuild").await;

        let (status, body) =
            send(&app, "GET", &format!("/bids/{bid_id}"), Some(MEMBER), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["currentStatus"], json!("DRAFT"));
        assert_eq!(body["ownerId"], json!(MEMBER));
        assert_eq!(body["statusHistory"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_error_status_mapping() {
        let (app_state, org) = create_test_app_state();
        let app: Router = build_router(app_state);
        let bid_id = create(&app, MEMBER, org, "Mapped").await;

        let (status, _) = send(&app, "GET", "/bids/9999", Some(MEMBER), None).await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", &format!("/bids/{bid_id}"), Some(OUTSIDER), None).await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);

        let transition = format!("/bids/{bid_id}/transition");
        let (status, body) = send(
            &app,
            "POST",
            &transition,
            Some(MEMBER),
            Some(json!({"status": "WON"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], json!(true));

        let (status, _) = send(
            &app,
            "POST",
            &transition,
            Some(MEMBER),
            Some(json!({"status": "WITHDRAWN"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            &app,
            "POST",
            &transition,
            Some(MEMBER),
            Some(json!({"status": "WITHDRAWN", "withdrawalReason": "BUDGET_TOO_LOW"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/bids/{bid_id}"),
            Some(MEMBER),
            Some(json!({"title": "Too late"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "GET",
            &format!("/bids?organization_id={org}&sort_order=sideways"),
            Some(MEMBER),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_backlog_and_metrics_routes() {
        let (app_state, org) = create_test_app_state();
        let app: Router = build_router(app_state);
        create(&app, MEMBER, org, "Mine").await;
        create(&app, OWNER, org, "Not mine").await;

        let (status, body) = send(
            &app,
            "GET",
            &format!("/bids?organization_id={org}&limit=500"),
            Some(MEMBER),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["total"], json!(1));
        assert_eq!(body["limit"], json!(100));
        assert_eq!(body["hasNext"], json!(false));

        let (status, body) = send(
            &app,
            "GET",
            &format!("/bids/backlog/draft?organization_id={org}"),
            Some(MANAGER),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["total"], json!(0));

        let (status, _) = send(
            &app,
            "GET",
            &format!("/bids/backlog/someday?organization_id={org}"),
            Some(MANAGER),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            "GET",
            &format!("/bids/metrics?organization_id={org}"),
            Some(MANAGER),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["total"], json!(2));
        assert_eq!(body["byStatus"]["DRAFT"], json!(2));

        // Metrics never fail, even for a caller outside the organization.
        let (status, body) = send(
            &app,
            "GET",
            &format!("/bids/metrics?organization_id={org}"),
            Some(OUTSIDER),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["total"], json!(0));
    }

    #[tokio::test]
    async fn test_bulk_delete_route() {
        let (app_state, org) = create_test_app_state();
        let app: Router = build_router(app_state);
        let first = create(&app, MEMBER, org, "First").await;
        let second = create(&app, MEMBER, org, "Second").await;

        let (status, body) = send(
            &app,
            "POST",
            "/bids/bulk-delete",
            Some(MEMBER),
            Some(json!({"ids": [first, 4242, second], "organizationId": org})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body, json!({"deleted": 2, "failed": [4242]}));
    }

    #[test]
    fn test_cli_builds_config() {
        let args = Args::parse_from([
            "bidline-server",
            "--visibility",
            "managers-and-admins",
            "--draft-aging-days",
            "10",
        ]);
        let config = args.pipeline_config().unwrap();
        assert_eq!(
            config.visibility.org_wide_roles(),
            &[MemberRole::Admin, MemberRole::PipelineManager]
        );
        assert_eq!(config.default_thresholds.draft_aging_days, 10);
        assert_eq!(config.default_thresholds.follow_up_sla_days, 3);

        let args = Args::parse_from(["bidline-server", "--org-wide-role", "OWNER"]);
        assert_eq!(
            args.pipeline_config().unwrap().visibility.org_wide_roles(),
            &[MemberRole::Owner]
        );

        assert!(Args::try_parse_from(["bidline-server", "--visibility", "everyone"]).is_err());
    }
}
