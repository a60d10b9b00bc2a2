//! HTTP mapping of gateway errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cgate_core::GatewayError;
use tracing::{error, warn};

use crate::openai::ErrorBody;

/// `GatewayError` on its way to the client.
///
/// Client faults map to 400, everything else to 500. The body is always
/// `{"error": "<message>"}`.
#[derive(Debug)]
pub struct GatewayHttpError(pub GatewayError);

impl GatewayHttpError {
    pub const fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<GatewayError> for GatewayHttpError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for GatewayHttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();
        if status.is_server_error() {
            error!(error = %message, "Request failed");
        } else {
            warn!(error = %message, "Request rejected");
        }
        (status, Json(ErrorBody::new(message))).into_response()
    }
}
