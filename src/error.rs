use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::booking::BookingError;

// Postgres SQLSTATE codes
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    success: bool,
    message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn bad_request(what: impl Into<String>) -> Self {
        AppError::BadRequest(what.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Internal(err) => {
                tracing::error!("internal error: {:?}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ApiError { success: false, message })).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::ShowNotFound { show_id, .. } => {
                AppError::NotFound(format!("show ID {} not found", show_id))
            }
            BookingError::SeatAlreadySelected { .. } => AppError::Conflict(
                "Sorry! These seats are no longer available. Please try again with other seats."
                    .to_string(),
            ),
            BookingError::TooManySeats { max, .. } => AppError::BadRequest(format!(
                "You can select a maximum of {} seats at a time.",
                max
            )),
            BookingError::NoSeatsSelected => {
                AppError::BadRequest("Please select at least one seat.".to_string())
            }
            err @ BookingError::Storage { .. } => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::RowNotFound) {
            return AppError::NotFound("record not found".to_string());
        }
        if is_unique_violation(&err) {
            return AppError::Conflict("record already exists".to_string());
        }
        if is_foreign_key_violation(&err) {
            return AppError::NotFound("referenced record not found".to_string());
        }
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let codes: Vec<&str> = errs.iter().map(|e| &*e.code).collect();
                format!("'{}' is {}", field, codes.join(", "))
            })
            .collect();
        fields.sort();
        AppError::BadRequest(fields.join("; "))
    }
}

fn database_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    database_code(err).as_deref() == Some(UNIQUE_VIOLATION)
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    database_code(err).as_deref() == Some(FOREIGN_KEY_VIOLATION)
}
