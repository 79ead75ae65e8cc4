//! Error types for the game API.
//!
//! [`ApiError`] unifies request validation failures and classified game
//! errors into a single enum that converts into an Axum HTTP response with
//! a JSON body of the form `{"error": "...", "status": N}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use burnrate_core::{ErrorKind, GameError};

/// Errors that can occur in the game API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was missing, malformed, or had empty fields.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The game rejected the operation. State is unchanged.
    #[error(transparent)]
    Game(#[from] GameError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status code for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Game(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::PreconditionFailed => StatusCode::CONFLICT,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use burnrate_types::ContractId;

    use super::*;

    #[test]
    fn game_errors_map_by_kind() {
        let not_found = ApiError::from(GameError::ContractNotFound(ContractId::new("CRG-1-1")));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let conflict = ApiError::from(GameError::TankFull);
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.to_string(), "tank is already full");
    }

    #[test]
    fn every_api_error_is_a_client_error() {
        let errors = [
            ApiError::Validation("contract_id must not be empty".to_owned()),
            ApiError::from(GameError::UnknownLocation("gamma".to_owned())),
            ApiError::from(GameError::NoModuleSlots { max: 1 }),
        ];
        for err in errors {
            assert!(err.status().is_client_error(), "{err} -> {}", err.status());
        }
    }

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError::Validation("contract_id must not be empty".to_owned());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
