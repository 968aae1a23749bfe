//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{error, warn};

use crate::rzd::{RzdError, Transport};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<T: Transport + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes", get(search_routes::<T>))
        .route("/api/routes/return", get(search_routes_return::<T>))
        .route("/api/carriages", get(search_carriages::<T>))
        .route("/api/stations", get(search_stations::<T>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search one-way routes between two stations.
async fn search_routes<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<RouteSearchRequest>,
) -> Result<Json<RouteSearchResponse>, AppError> {
    let search = req.to_search().map_err(AppError::bad_request)?;
    let cancel = state.shutdown.child_token();

    let routes = state.rzd.search_routes(&search, &cancel).await?;

    Ok(Json(RouteSearchResponse {
        routes: routes.iter().map(RouteResult::from).collect(),
    }))
}

/// Search outbound and return routes.
async fn search_routes_return<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<RoundTripRequest>,
) -> Result<Json<RoundTripResponse>, AppError> {
    let search = req.to_search().map_err(AppError::bad_request)?;
    let cancel = state.shutdown.child_token();

    let trip = state.rzd.search_routes_return(&search, &cancel).await?;

    Ok(Json(RoundTripResponse::from(&trip)))
}

/// List the carriages of one train.
async fn search_carriages<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<CarriageSearchRequest>,
) -> Result<Json<CarriageSearchResponse>, AppError> {
    let search = req.to_search().map_err(AppError::bad_request)?;
    let cancel = state.shutdown.child_token();

    let cars = state.rzd.search_carriages(&search, &cancel).await?;

    Ok(Json(CarriageSearchResponse {
        cars: cars.iter().map(CarResult::from).collect(),
    }))
}

/// Suggest stations by name.
async fn search_stations<T: Transport>(
    State(state): State<AppState<T>>,
    Query(req): Query<StationSearchRequest>,
) -> Result<Json<StationSearchResponse>, AppError> {
    let search = req.to_search();
    let cancel = state.shutdown.child_token();

    let stations = state.rzd.search_stations(&search, &cancel).await?;

    Ok(Json(StationSearchResponse {
        stations: stations.iter().map(StationResult::from).collect(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    GatewayTimeout { message: String },
    Internal { message: String },
}

impl AppError {
    fn bad_request(message: String) -> Self {
        AppError::BadRequest { message }
    }
}

impl From<RzdError> for AppError {
    fn from(e: RzdError) -> Self {
        let message = e.to_string();
        match e {
            RzdError::InvalidRequest(_) => AppError::BadRequest { message },
            RzdError::Business(_) => AppError::NotFound { message },
            RzdError::Cancelled => AppError::GatewayTimeout { message },
            RzdError::Config(_) => AppError::Internal { message },
            RzdError::Transport(_)
            | RzdError::Challenge(_)
            | RzdError::UnexpectedResult(_)
            | RzdError::Mapping(_)
            | RzdError::RetryBudgetExhausted { .. } => AppError::BadGateway { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::GatewayTimeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
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
