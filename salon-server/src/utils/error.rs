//! Error plumbing between the storage layer and the HTTP layer
//!
//! Re-exports the unified error types from `shared::error` and maps
//! repository errors onto them.

pub use shared::error::{AppError, AppResult, ErrorBody, ErrorCategory, ErrorCode};

use crate::db::repository::RepoError;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_repo_error_mapping() {
        let err: AppError = RepoError::NotFound("Service 1 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Service 1 not found");

        let err: AppError = RepoError::Duplicate("name".into()).into();
        assert_eq!(err.http_status(), StatusCode::CONFLICT);

        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
