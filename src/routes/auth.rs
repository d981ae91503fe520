use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::user;
use crate::error::{json_body, ApiError, ApiResult};
use crate::extractor::AuthUser;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

/// Upper bound accepted for `--token-ttl-days`.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

// ─── JWT Claims ───

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i32, // user id
    pub username: String,
    pub exp: usize,
}

// ─── Routes ───

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let mut req = json_body(payload)?;
    req.username = req.username.trim().to_lowercase();
    req.display_name = req.display_name.trim().to_string();
    req.validate()?;

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&req.username))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Username already taken".into()));
    }

    let password_hash = hash_password(&req.password)?;
    let u = user::ActiveModel {
        username: Set(req.username),
        display_name: Set(req.display_name),
        password_hash: Set(password_hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!("Registered user {} ({})", u.username, u.id);

    let token = create_jwt(&state.jwt_secret, u.id, &u.username, state.token_ttl_days)?;
    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token,
            user: u.into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let req = json_body(payload)?;
    let username = req.username.trim().to_lowercase();

    let u = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".into()))?;

    verify_password(&req.password, &u.password_hash)?;

    let token = create_jwt(&state.jwt_secret, u.id, &u.username, state.token_ttl_days)?;
    let jar = jar.add(session_cookie(&state, token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: u.into(),
        }),
    ))
}

pub async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (StatusCode::NO_CONTENT, jar)
}

pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let u = user::Entity::find_by_id(auth.id)
        .one(&state.db)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(u.into()))
}

// ─── Password + JWT helpers ───

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(format!("Hash error: {e}")))
}

fn verify_password(password: &str, hash: &str) -> ApiResult<()> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| ApiError::Internal("Hash parse error".into()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Unauthorized("Invalid username or password".into()))
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.secure_cookies)
        .max_age(time::Duration::seconds(
            state.token_ttl_days.saturating_mul(86_400),
        ))
        .build()
}

pub fn create_jwt(secret: &str, user_id: i32, username: &str, ttl_days: i64) -> ApiResult<String> {
    let expiration = chrono::Duration::try_days(ttl_days)
        .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
        .and_then(|exp| usize::try_from(exp.timestamp()).ok())
        .ok_or_else(|| {
            ApiError::Internal(format!("Token lifetime of {ttl_days} days is out of range"))
        })?;

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("JWT error: {e}")))
}

pub fn decode_jwt(secret: &str, token: &str) -> ApiResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {e}")))?;

    Ok(data.claims)
}
