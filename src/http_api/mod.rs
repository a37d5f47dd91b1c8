use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;

use crate::{
    CalendarTable, MonthRosterEntry, ResolutionOutcome, YearReport, build_year_report,
    filter_by_month, parse_month_name, resolve,
};

#[derive(Clone)]
pub struct AppState {
    table: Arc<CalendarTable>,
}

impl AppState {
    pub fn new(table: CalendarTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn with_shared(table: Arc<CalendarTable>) -> Self {
        Self { table }
    }

    fn table(&self) -> &CalendarTable {
        &self.table
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

impl From<crate::NotFoundError> for ApiError {
    fn from(value: crate::NotFoundError) -> Self {
        ApiError::NotFound(value.to_string())
    }
}

#[derive(Debug, Serialize)]
struct EventListing<'a> {
    events: &'a [String],
    years: &'a [i32],
}

#[derive(Debug, Serialize)]
struct EventLookup {
    event: String,
    year: i32,
    outcome: ResolutionOutcome,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(list_events))
        .route("/years/:year/events/:event", get(get_event))
        .route("/years/:year/months/:month", get(get_month))
        .route("/years/:year/report", get(get_report))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, table: Arc<CalendarTable>) -> std::io::Result<()> {
    let state = AppState::with_shared(table);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_events(State(state): State<AppState>) -> Response {
    let table = state.table();
    Json(EventListing {
        events: table.events(),
        years: table.years(),
    })
    .into_response()
}

async fn get_event(
    State(state): State<AppState>,
    Path((year, event)): Path<(i32, String)>,
) -> Result<Json<EventLookup>, ApiError> {
    let outcome = resolve(state.table(), &event, year)?;
    Ok(Json(EventLookup {
        event,
        year,
        outcome,
    }))
}

async fn get_month(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, String)>,
) -> Result<Json<Vec<MonthRosterEntry>>, ApiError> {
    let month = parse_month_name(&month)
        .ok_or_else(|| ApiError::Invalid(format!("unknown month '{month}'")))?;
    Ok(Json(filter_by_month(state.table(), year, month)))
}

async fn get_report(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Json<YearReport> {
    Json(build_year_report(state.table(), year))
}
