pub mod admin;
pub mod bookings;
pub mod movies;
pub mod users;

use axum::{Json, Router};
use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiResult, AppError};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(users::routes())
        .merge(bookings::routes())
        .merge(admin::routes())
}

/// Rejects ids that can never exist.
pub(crate) fn positive_id(id: i32, name: &str) -> ApiResult<i32> {
    if id <= 0 {
        return Err(AppError::bad_request(format!("{} must be > 0", name)));
    }
    Ok(id)
}

/// Runs the derived validation rules of a request body.
pub(crate) fn validated<T: Validate>(Json(body): Json<T>) -> ApiResult<T> {
    body.validate()?;
    Ok(body)
}
