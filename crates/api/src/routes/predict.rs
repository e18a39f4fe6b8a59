//! Prediction Route

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, warn};

use artifact_store::PredictError;
use dataset::HouseRecord;
use feature_pipeline::EncodeError;

use crate::AppState;

/// Response for a successful prediction.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
    pub currency: &'static str,
}

/// Error body returned for failed predictions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Predict a sale price from the twelve raw fields.
pub async fn predict_handler(
    State(state): State<Arc<AppState>>,
    Json(record): Json<HouseRecord>,
) -> Response {
    let Some(bundle) = state.artifacts.bundle() else {
        warn!("Predict request while artifacts are unavailable");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Model artifacts are not loaded; run the training pipeline first",
        );
    };

    match bundle.predict(&record) {
        Ok(price) => {
            debug!("Predicted price {price:.2}");
            Json(PredictResponse {
                predicted_price: price,
                currency: "USD",
            })
            .into_response()
        }
        Err(PredictError::Encode(err @ EncodeError::UnknownLevel { .. })) => {
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            warn!("Prediction failed: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
