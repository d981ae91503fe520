use axum::{extract::FromRequestParts, http::request::Parts};

use crate::entities::comment;
use crate::error::ApiError;
use crate::extractor::{AuthUser, PathId};
use crate::repository;
use crate::state::AppState;

/// Only the author of a comment may change it.
pub fn is_comment_owner(user: &AuthUser, comment: &comment::Model) -> bool {
    comment.user_id == user.id
}

/// Guard for `/comments/{id}` mutations: authenticates the caller, loads the
/// comment and rejects anyone but its author before the handler runs.
#[derive(Debug, Clone)]
pub struct CommentOwner {
    pub user: AuthUser,
    pub comment: comment::Model,
}

impl FromRequestParts<AppState> for CommentOwner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;
        let PathId(comment_id) = PathId::<i32>::from_request_parts(parts, state).await?;

        let comment = repository::find_comment(&state.db, comment_id).await?;
        if !is_comment_owner(&user, &comment) {
            tracing::warn!(
                "User {} tried to modify comment {} owned by {}",
                user.id,
                comment.id,
                comment.user_id
            );
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action.".into(),
            ));
        }

        Ok(Self { user, comment })
    }
}
