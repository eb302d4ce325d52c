use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::{
    Conflict, DailySchedule, Event, EventUpdate, NewEvent, NewRoutine, Routine, RoutineUpdate,
    SemesterSchedule, Table, Timetable, TimetableError, calendar,
};

/// Shared handle to the timetable. Mutations take the write lock so each
/// read-modify-write of a table runs alone.
#[derive(Clone)]
pub struct AppState {
    timetable: Arc<RwLock<Timetable>>,
}

impl AppState {
    pub fn new(timetable: Timetable) -> Self {
        Self {
            timetable: Arc::new(RwLock::new(timetable)),
        }
    }

    pub fn with_shared(timetable: Arc<RwLock<Timetable>>) -> Self {
        Self { timetable }
    }

    fn timetable(&self) -> Arc<RwLock<Timetable>> {
        self.timetable.clone()
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
    Internal(String),
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<TimetableError> for ApiError {
    fn from(value: TimetableError) -> Self {
        match value {
            TimetableError::Validation(_) | TimetableError::MalformedDate { .. } => {
                ApiError::Invalid(value.to_string())
            }
            TimetableError::IndexOutOfRange { .. } | TimetableError::RecordNotFound { .. } => {
                ApiError::NotFound(value.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct UpcomingParams {
    now: Option<NaiveDateTime>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(list_events).post(create_event))
        .route("/events/:id", patch(update_event).delete(delete_event))
        .route("/routines", get(list_routines).post(create_routine))
        .route("/routines/:id", patch(update_routine).delete(delete_routine))
        .route("/schedule/day/:date", get(day_schedule))
        .route("/schedule/week/:date", get(week_schedule))
        .route("/schedule/semester", get(semester_schedule))
        .route("/schedule/upcoming", get(upcoming_events))
        .route("/conflicts/:date", get(conflicts))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, timetable: Timetable) -> std::io::Result<()> {
    let state = AppState::new(timetable);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn parse_path_date(raw: &str) -> Result<NaiveDate, ApiError> {
    Ok(calendar::parse_date("date", raw)?)
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let timetable = state.timetable();
    let events = timetable.read().events()?;
    Ok(Json(events))
}

async fn create_event(
    State(state): State<AppState>,
    Json(fields): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let timetable = state.timetable();
    let created = {
        let guard = timetable.write();
        let id = guard.append_event(fields)?;
        guard
            .events()?
            .into_iter()
            .find(|event| event.id == id)
            .ok_or_else(|| ApiError::internal("event not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<EventUpdate>,
) -> Result<Json<Event>, ApiError> {
    let timetable = state.timetable();
    let updated = {
        let guard = timetable.write();
        guard.update_by_key(&id, update)?;
        guard
            .events()?
            .into_iter()
            .find(|event| event.id == id)
            .ok_or_else(|| ApiError::internal("event not found after update"))?
    };
    Ok(Json(updated))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let timetable = state.timetable();
    timetable.write().delete_by_key(Table::Events, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_routines(State(state): State<AppState>) -> Result<Json<Vec<Routine>>, ApiError> {
    let timetable = state.timetable();
    let routines = timetable.read().routines()?;
    Ok(Json(routines))
}

async fn create_routine(
    State(state): State<AppState>,
    Json(fields): Json<NewRoutine>,
) -> Result<(StatusCode, Json<Routine>), ApiError> {
    let timetable = state.timetable();
    let created = {
        let guard = timetable.write();
        let id = guard.append_routine(fields)?;
        guard
            .routines()?
            .into_iter()
            .find(|routine| routine.id == id)
            .ok_or_else(|| ApiError::internal("routine not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<RoutineUpdate>,
) -> Result<Json<Routine>, ApiError> {
    let timetable = state.timetable();
    let updated = {
        let guard = timetable.write();
        guard.update_by_key(&id, update)?;
        guard
            .routines()?
            .into_iter()
            .find(|routine| routine.id == id)
            .ok_or_else(|| ApiError::internal("routine not found after update"))?
    };
    Ok(Json(updated))
}

async fn delete_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let timetable = state.timetable();
    timetable.write().delete_by_key(Table::Routines, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn day_schedule(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailySchedule>, ApiError> {
    let date = parse_path_date(&date)?;
    let timetable = state.timetable();
    let schedule = timetable.read().daily_schedule(date)?;
    Ok(Json(schedule))
}

async fn week_schedule(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<DailySchedule>>, ApiError> {
    let start = parse_path_date(&date)?;
    let timetable = state.timetable();
    let week = timetable.read().weekly_schedule(start)?;
    Ok(Json(week))
}

async fn semester_schedule(
    State(state): State<AppState>,
) -> Result<Json<SemesterSchedule>, ApiError> {
    let timetable = state.timetable();
    let semester = timetable.read().semester_schedule()?;
    Ok(Json(semester))
}

async fn upcoming_events(
    State(state): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let now = params
        .now
        .unwrap_or_else(|| chrono::Local::now().naive_local());
    let timetable = state.timetable();
    let upcoming = timetable.read().upcoming_events(now)?;
    Ok(Json(upcoming))
}

async fn conflicts(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<Conflict>>, ApiError> {
    let date = parse_path_date(&date)?;
    let timetable = state.timetable();
    let conflicts = timetable.read().conflicts_on(date)?;
    Ok(Json(conflicts))
}
