use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, ErrorCode};
use database::DatabaseError;
use sea_orm::DbErr;
use thiserror::Error;

use crate::pagination::MAX_PAGE_SIZE;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("Please use the query params \"from\" and \"size\" concomitantly")]
    MissingPagingParameter,

    #[error("Please use a maximum page size of {max} objects", max = MAX_PAGE_SIZE)]
    PageSizeTooLarge,

    #[error("Invalid paging parameter: {0}")]
    InvalidPagingParameter(String),

    #[error("Store error: {0}")]
    Store(#[from] DatabaseError),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        UserError::Store(DatabaseError::from(err))
    }
}

/// Single mapping from domain errors to HTTP errors
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidInput(msg) => AppError::BadRequest(msg),
            UserError::InvalidId(_) => {
                AppError::InvalidId(ErrorCode::InvalidId.default_message().to_string())
            }
            err @ (UserError::MissingPagingParameter
            | UserError::PageSizeTooLarge
            | UserError::InvalidPagingParameter(_)) => AppError::InvalidPaging(err.to_string()),
            UserError::Store(e) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl UserError {
    /// Like `AppError::from`, but a store failure reports `failure` to the
    /// client and keeps the driver error in the logs.
    pub fn or_failed(self, failure: impl Into<String>) -> AppError {
        match self {
            UserError::Store(e) => AppError::OperationFailed {
                message: failure.into(),
                cause: e.to_string(),
            },
            other => other.into(),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
