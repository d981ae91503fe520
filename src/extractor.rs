use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Path},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::routes::auth::{decode_jwt, SESSION_COOKIE};
use crate::state::AppState;

/// The authenticated caller, taken from `Authorization: Bearer <jwt>`
/// (`Token <jwt>` is accepted too) or from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
}

impl AuthUser {
    fn from_token(state: &AppState, token: &str) -> Result<Self, ApiError> {
        let claims = decode_jwt(&state.jwt_secret, token)?;
        Ok(Self {
            id: claims.sub,
            username: claims.username,
        })
    }
}

/// Raw token from the request, if the client sent one at all.
fn credentials(parts: &Parts) -> Result<Option<String>, ApiError> {
    if let Some(value) = parts.headers.get(AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".into()))?;
        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("Token "))
            .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".into()))?;
        return Ok(Some(token.trim().to_string()));
    }

    let jar = CookieJar::from_headers(&parts.headers);
    Ok(jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match credentials(parts)? {
            Some(token) => Self::from_token(state, &token),
            None => Err(ApiError::Unauthorized(
                "Authentication credentials were not provided.".into(),
            )),
        }
    }
}

/// Anonymous callers yield `None`; credentials that are present but bad are
/// still rejected.
impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        credentials(parts)?
            .map(|token| Self::from_token(state, &token))
            .transpose()
    }
}

/// `Path` whose rejection is our 404 instead of axum's plain-text 400.
#[derive(Debug, Clone, Copy)]
pub struct PathId<T>(pub T);

impl<T, S> FromRequestParts<S> for PathId<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = <Path<T> as FromRequestParts<S>>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}
