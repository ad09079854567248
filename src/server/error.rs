//! API error type and its JSON response

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::error::LayoutError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Layout(err) => StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::bad_request(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::bad_request(err.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(LayoutError::Unauthorized).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(LayoutError::Conflict { key: "poems".into() }).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::bad_request("missing page").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_storage_message_is_verbatim() {
        let err = ApiError::from(LayoutError::from(StoreError::Backend("disk full".into())));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "storage error: disk full");
    }
}
