use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::map::{render_page, ColorField};
use crate::types::MergedCountyRow;

#[derive(Clone)]
struct DashboardState {
    rows: Arc<Vec<MergedCountyRow>>,
    geometry: Arc<Value>,
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

    fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
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

#[derive(Debug, Clone, Default, Deserialize)]
struct DashboardQuery {
    color: Option<String>,
}

fn router(rows: Vec<MergedCountyRow>, geometry: Value) -> Router {
    let state = DashboardState {
        rows: Arc::new(rows),
        geometry: Arc::new(geometry),
    };
    Router::new()
        .route("/", get(dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(rows: Vec<MergedCountyRow>, geometry: Value, bind: SocketAddr) -> Result<()> {
    let app = router(rows, geometry);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("dashboard listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn dashboard(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, ApiError> {
    let field = match query.color.as_deref() {
        Some(raw) => raw
            .parse::<ColorField>()
            .map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => ColorField::default(),
    };
    let page = render_page(&state.rows, &state.geometry, field).map_err(ApiError::internal)?;
    Ok(Html(page))
}
