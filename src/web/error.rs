//! HTTP-facing error type

use axum::{http::StatusCode, response::IntoResponse};

use crate::analysis::AnalysisError;

/// Errors returned by the web handlers
#[derive(Debug)]
pub enum AppError {
    /// The book search could not complete
    Upstream(String),
    /// The analysis itself failed
    Internal(String),
    /// Body extraction failed; carries the extractor's own status (400, 413, 415)
    Rejected(StatusCode, String),
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Search(_) => AppError::Upstream(err.to_string()),
            AnalysisError::Worker(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Rejected(status, msg) => (status, msg),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {} - {}", status, message);
        } else {
            tracing::warn!("Request rejected: {} - {}", status, message);
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::BookSearchError;

    #[test]
    fn test_status_mapping() {
        let upstream =
            AppError::from(AnalysisError::from(BookSearchError::Network("refused".into())))
                .into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let worker = AppError::from(AnalysisError::Worker("panicked".into())).into_response();
        assert_eq!(worker.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let too_large =
            AppError::Rejected(StatusCode::PAYLOAD_TOO_LARGE, "too big".into()).into_response();
        assert_eq!(too_large.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
