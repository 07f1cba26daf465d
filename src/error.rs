//! Error type shared by the upstream client, the editor and the HTTP layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::domain::ItemId;

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("platform API returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("platform API unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Decode(String),
    #[error("{0}")]
    Validation(String),
    #[error("invalid edit: {0}")]
    InvalidEdit(String),
    #[error("editor session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
}

impl AdminError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "E_UPSTREAM",
            Self::Transport(_) => "E_TRANSPORT",
            Self::Decode(_) => "E_DECODE",
            Self::Validation(_) => "E_VALIDATION",
            Self::InvalidEdit(_) => "E_INVALID_EDIT",
            Self::SessionNotFound(_) => "E_SESSION_NOT_FOUND",
            Self::ItemNotFound(_) => "E_ITEM_NOT_FOUND",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Upstream { .. } | Self::Transport(_) | Self::Decode(_) => StatusCode::BAD_GATEWAY,
            Self::Validation(_) | Self::InvalidEdit(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) | Self::ItemNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string(), "code": self.error_code() });
        (self.status(), Json(body)).into_response()
    }
}

pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_tier() {
        let upstream = AdminError::Upstream { status: 500, message: "boom".into() };
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.error_code(), "E_UPSTREAM");
        assert_eq!(upstream.to_string(), "platform API returned 500: boom");

        assert_eq!(AdminError::Validation("title".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AdminError::SessionNotFound(Uuid::nil()).status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn response_carries_error_and_code() {
        let resp = AdminError::InvalidEdit("bad value".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "E_INVALID_EDIT");
        assert_eq!(body["error"], "invalid edit: bad value");
    }
}
