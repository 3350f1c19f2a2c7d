use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::users::repo::RepoError;

/// Every failure a handler can hand back. Turning one into a response is
/// the only place non-2xx bodies are written.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
    #[error("User already exists")]
    DuplicateUser,
    #[error("Resource not found")]
    NotFound,
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Error creating user")]
    Internal(#[source] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: &'static str,
    pub path: String,
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: Vec<ErrorEntry>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateUser => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Identifier reported as both `type` and `name` on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields => "MissingFields",
            Self::InvalidBody(_) => "InvalidBody",
            Self::DuplicateUser => "DuplicateUser",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::Internal(_) => "InternalError",
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: vec![ErrorEntry {
                kind: self.kind(),
                name: self.kind(),
                path: String::new(),
                location: String::new(),
            }],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(source) => {
                let detail = format!("{source:#}");
                error!(%status, kind = self.kind(), error = %detail, "{}", self);
            }
            _ => warn!(%status, kind = self.kind(), "{}", self),
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<RepoError> for AppError {
    fn from(error: RepoError) -> Self {
        match error {
            RepoError::DuplicateEmail => Self::DuplicateUser,
            RepoError::Database(e) => Self::Internal(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn envelope_carries_kind_twice_and_blank_location() {
        let (status, body) = render(AppError::MissingFields).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({
                "error": [{
                    "type": "MissingFields",
                    "name": "MissingFields",
                    "path": "",
                    "location": ""
                }]
            })
        );
    }

    #[tokio::test]
    async fn internal_detail_stays_out_of_body() {
        let err = AppError::Internal(anyhow::anyhow!("password authentication failed for user postgres"));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"][0]["type"], "InternalError");
        assert!(!body.to_string().contains("postgres"));
    }

    #[test]
    fn repo_errors_map_to_wire_kinds() {
        let dup: AppError = RepoError::DuplicateEmail.into();
        assert_eq!(dup.status(), StatusCode::CONFLICT);
        assert_eq!(dup.kind(), "DuplicateUser");

        let db: AppError = RepoError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(db.kind(), "InternalError");
    }
}
