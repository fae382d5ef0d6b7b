use tracing::info;

use crate::auth;
use crate::cache::CacheService;
use crate::config::JwtConfig;
use crate::database::Database;
use crate::error::{is_unique_violation, ApiResult, AppError};
use crate::models::user::{NewUser, User, UserProfile};

pub struct Signup<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub password: &'a str,
}

pub async fn sign_up(db: &Database, signup: &Signup<'_>) -> ApiResult<i32> {
    let password = signup.password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))?;

    let email = signup.email.trim().to_lowercase();
    let user = NewUser {
        name: signup.name.trim(),
        surname: signup.surname.trim(),
        email: &email,
        phone_number: signup.phone_number.trim(),
        password_hash: &password_hash,
    };

    let user_id = User::insert(&user, db).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("a user with this email already exists".to_string())
        } else {
            AppError::from(e)
        }
    })?;

    info!(user_id, "user signed up");
    Ok(user_id)
}

/// Checks the credentials and issues a bearer token.
pub async fn log_in(
    db: &Database,
    jwt: &JwtConfig,
    email: &str,
    password: &str,
) -> ApiResult<String> {
    let invalid = || AppError::Unauthorized("invalid email or password".to_string());

    let user = User::find_by_email(&email.trim().to_lowercase(), db)
        .await?
        .ok_or_else(invalid)?;

    let password = password.to_string();
    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    if !matches {
        return Err(invalid());
    }

    let token =
        auth::issue_token(user.id, &user.role, jwt).map_err(|e| AppError::Internal(e.into()))?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}

pub async fn profile(db: &Database, cache: &CacheService, user_id: i32) -> ApiResult<UserProfile> {
    if let Some(profile) = cache.cached_profile(user_id).await {
        return Ok(profile);
    }

    let profile = UserProfile::find(user_id, db)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
    cache.cache_profile(user_id, &profile).await;
    Ok(profile)
}

pub async fn update_profile(
    db: &Database,
    cache: &CacheService,
    user_id: i32,
    name: &str,
    surname: &str,
    phone_number: &str,
) -> ApiResult<UserProfile> {
    let profile = UserProfile::update(user_id, name.trim(), surname.trim(), phone_number.trim(), db)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;

    cache.cache_profile(user_id, &profile).await;
    info!(user_id, "profile updated");
    Ok(profile)
}
