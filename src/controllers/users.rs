use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::controllers::validated;
use crate::error::ApiResult;
use crate::middleware::AuthUser;
use crate::services::users::{self, Signup};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/signup", post(sign_up))
        .route("/user/login", post(log_in))
        .route("/my-profile", get(my_profile))
        .route("/my-profile/edit", put(edit_profile))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EditProfileForm {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: String,
}

/// At least 8 characters with a lowercase and an uppercase letter, a digit
/// and a special character.
fn validate_password(password: &str) -> Result<(), ValidationError> {
    let long_enough = password.chars().count() >= 8;
    let lower = password.chars().any(|c| c.is_lowercase());
    let upper = password.chars().any(|c| c.is_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let special = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if long_enough && lower && upper && digit && special {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password"))
    }
}

/// Digits with an optional leading `+`.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !digits.is_empty() && digits.len() <= 20 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone_number"))
    }
}

// POST /api/v1/user/signup
async fn sign_up(
    State(state): State<Arc<AppState>>,
    body: Json<SignupForm>,
) -> ApiResult<impl IntoResponse> {
    let form = validated(body)?;
    users::sign_up(
        &state.db,
        &Signup {
            name: &form.name,
            surname: &form.surname,
            email: &form.email,
            phone_number: &form.phone_number,
            password: &form.password,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Account created. You can now log in." })),
    ))
}

// POST /api/v1/user/login
async fn log_in(
    State(state): State<Arc<AppState>>,
    body: Json<LoginForm>,
) -> ApiResult<impl IntoResponse> {
    let form = validated(body)?;
    let token = users::log_in(&state.db, &state.config.jwt, &form.email, &form.password).await?;
    Ok(Json(json!({ "success": true, "token": token })))
}

// GET /api/v1/my-profile
async fn my_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let profile = users::profile(&state.db, &state.cache, user.user_id).await?;
    Ok(Json(json!({ "success": true, "profile": profile })))
}

// PUT /api/v1/my-profile/edit
async fn edit_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    body: Json<EditProfileForm>,
) -> ApiResult<impl IntoResponse> {
    let form = validated(body)?;
    let profile = users::update_profile(
        &state.db,
        &state.cache,
        user.user_id,
        &form.name,
        &form.surname,
        &form.phone_number,
    )
    .await?;
    Ok(Json(json!({ "success": true, "profile": profile })))
}
