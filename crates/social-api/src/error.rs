use axum::{
    extract::rejection::{BytesRejection, JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Every failure a handler can produce. Responses never carry a body;
/// the cause only goes to the log.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A business rule refused the request.
    #[error("{reason}")]
    Rejected { status: StatusCode, reason: String },

    #[error("unreadable request body: {0}")]
    Body(#[from] BytesRejection),

    #[error("malformed JSON body: {0}")]
    Json(#[from] JsonRejection),

    #[error("malformed path parameter: {0}")]
    Path(#[from] PathRejection),

    #[error("store failure: {0:#}")]
    Store(#[from] anyhow::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn rejected(status: StatusCode, reason: impl std::fmt::Display) -> Self {
        Self::Rejected {
            status,
            reason: reason.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Body(_) | Self::Json(_) | Self::Path(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Rejected { .. } => debug!("Request rejected: {}", self),
            Self::Body(_) | Self::Json(_) | Self::Path(_) => warn!("Bad request: {}", self),
            Self::Store(_) | Self::Join(_) => error!("{}", self),
        }

        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_keeps_its_status() {
        let err = ApiError::rejected(StatusCode::UNAUTHORIZED, "bad password");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "bad password");
    }

    #[tokio::test]
    async fn store_failure_is_500_with_empty_body() {
        let response = ApiError::Store(anyhow::anyhow!("disk gone")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
