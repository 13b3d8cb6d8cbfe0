//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::scheduler::{RouteSchedule, SchedulerError, schedule_from_value};
use crate::views::{ViewConfig, build_duty_board, build_pivot, build_timetable, collect_duties};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes/:id/grid", get(route_grid))
        .route("/api/routes/:id/duty-board", get(route_duty_board))
        .route("/api/routes/:id/timetable", get(route_timetable))
        .route("/api/views", post(render_views))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Event-by-duty grid for a stored route.
async fn route_grid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GridResponse>, AppError> {
    let rs = state.backend.fetch_route_schedule(&id).await?;
    let collection = collect_duties(&rs.schedule, &state.views);

    Ok(Json(GridResponse {
        route: rs.route.clone(),
        warnings: rs.schedule.warnings.clone(),
        issues: rs.schedule.issues.clone(),
        grid: build_pivot(&collection, &state.views),
    }))
}

/// Duty board for a stored route.
async fn route_duty_board(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DutyBoardResponse>, AppError> {
    let rs = state.backend.fetch_route_schedule(&id).await?;
    let collection = collect_duties(&rs.schedule, &state.views);
    let board = build_duty_board(&collection, &state.views);

    let mut issues = rs.schedule.issues.clone();
    issues.extend(board.excluded.iter().map(|e| e.issue.clone()));

    Ok(Json(DutyBoardResponse {
        route: rs.route.clone(),
        warnings: rs.schedule.warnings.clone(),
        issues,
        board,
    }))
}

/// Public timetable for a stored route.
async fn route_timetable(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TimetableResponse>, AppError> {
    let rs = state.backend.fetch_route_schedule(&id).await?;

    Ok(Json(TimetableResponse {
        route: rs.route.clone(),
        warnings: rs.schedule.warnings.clone(),
        timetable: build_timetable(
            &rs.schedule,
            rs.route.origin(),
            rs.route.destination(),
            &state.views,
        ),
    }))
}

/// All three views for a schedule posted by the caller.
async fn render_views(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ViewsResponse>, AppError> {
    // Parse JSON manually so the body can be logged on failure
    let req: ViewsRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, body = %String::from_utf8_lossy(&body), "invalid views request");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let schedule = if req.schedule.is_null() {
        Default::default()
    } else {
        schedule_from_value(req.schedule).map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?
    };

    let rs = RouteSchedule {
        route: req.route,
        schedule,
    };
    Ok(Json(all_views(rs, &state.views)))
}

fn all_views(rs: RouteSchedule, config: &ViewConfig) -> ViewsResponse {
    let collection = collect_duties(&rs.schedule, config);
    let grid = build_pivot(&collection, config);
    let board = build_duty_board(&collection, config);
    let timetable = build_timetable(
        &rs.schedule,
        rs.route.origin(),
        rs.route.destination(),
        config,
    );

    let mut issues = rs.schedule.issues;
    issues.extend(board.excluded.iter().map(|e| e.issue.clone()));

    ViewsResponse {
        route: rs.route,
        warnings: rs.schedule.warnings,
        issues,
        grid,
        board,
        timetable,
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The route store failed or sent something unusable.
    Upstream { message: String },
    Internal { message: String },
}

impl From<SchedulerError> for AppError {
    fn from(e: SchedulerError) -> Self {
        match e {
            SchedulerError::RouteNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            SchedulerError::NotConfigured(_) => AppError::Internal {
                message: e.to_string(),
            },
            SchedulerError::Http(_) | SchedulerError::Json { .. } | SchedulerError::Api { .. } => {
                AppError::Upstream {
                    message: e.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
