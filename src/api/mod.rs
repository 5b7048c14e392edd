use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Json, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{ForecastResult, ForecastService, SidekickError};

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub result: ForecastResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for SidekickError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

pub fn router(service: Arc<ForecastService>) -> Router {
    Router::new()
        .route("/forecast", post(post_forecast))
        .with_state(service)
}

async fn post_forecast(
    State(service): State<Arc<ForecastService>>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, SidekickError> {
    let location = match payload {
        Ok(Json(request)) => request.location,
        Err(rejection) => {
            warn!("Rejected forecast request body: {}", rejection);
            None
        }
    };

    let location = location
        .map(|location| location.trim().to_string())
        .filter(|location| !location.is_empty())
        .ok_or_else(|| SidekickError::validation("location missing or empty"))?;

    let result = service.forecast(&location).await.map_err(|err| {
        error!("Error: {}", err);
        err
    })?;

    Ok(Json(ForecastResponse { result }))
}
