use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::calendar::MonthCalendar;
use crate::error::CalendarError;
use crate::html;
use crate::types::{AddDueDateRequest, CalendarView, NewDueDate};

/// Application state shared across requests
pub struct AppState {
    pub calendar: RwLock<MonthCalendar>,
}

impl AppState {
    pub fn new(calendar: MonthCalendar) -> Arc<Self> {
        Arc::new(Self {
            calendar: RwLock::new(calendar),
        })
    }
}

/// Build the router for the calendar page and its JSON API
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/calendar", get(calendar_handler))
        .route("/api/add-due-date", post(add_due_date_handler))
        .route("/api/next-month", post(next_month_handler))
        .route("/api/prev-month", post(prev_month_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server
pub async fn serve(port: u16, calendar: MonthCalendar) -> anyhow::Result<()> {
    info!(
        month = %calendar.month_name(),
        year = calendar.year(),
        entries = calendar.total_entries(),
        "Starting calendar"
    );
    let state = AppState::new(calendar);
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(url = %format!("http://{}", addr), "Server running");

    axum::serve(listener, app).await?;

    Ok(())
}

impl IntoResponse for CalendarError {
    fn into_response(self) -> Response {
        warn!(error = %self, "Rejected request");
        let body = json!({
            "status": "error",
            "message": self.to_string(),
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Serve the main HTML page
async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let calendar = state.calendar.read().await;
    let markup = html::render_page(&calendar.to_view_model());
    Html(markup.into_string())
}

/// Return the current view as JSON
async fn calendar_handler(State(state): State<Arc<AppState>>) -> Json<CalendarView> {
    let calendar = state.calendar.read().await;
    Json(calendar.to_view_model())
}

/// Attach a due date to a day of the displayed month
async fn add_due_date_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddDueDateRequest>, JsonRejection>,
) -> Result<Json<Value>, CalendarError> {
    let Json(request) = payload.map_err(|rejection| {
        CalendarError::Validation(rejection.body_text())
    })?;
    let new = NewDueDate::try_from(request)?;
    let day = new.day;

    let mut calendar = state.calendar.write().await;
    calendar.add_due_date(new)?;
    info!(
        day = day,
        entries = calendar.entries_for_day(day).len(),
        "Due date added"
    );

    Ok(Json(json!({
        "status": "success",
        "message": "Due date added successfully",
    })))
}

async fn next_month_handler(State(state): State<Arc<AppState>>) -> Json<CalendarView> {
    let mut calendar = state.calendar.write().await;
    calendar.next_month();
    Json(calendar.to_view_model())
}

async fn prev_month_handler(State(state): State<Arc<AppState>>) -> Json<CalendarView> {
    let mut calendar = state.calendar.write().await;
    calendar.prev_month();
    Json(calendar.to_view_model())
}
