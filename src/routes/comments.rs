use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use sea_orm::*;

use crate::entities::comment;
use crate::error::{json_body, query_params, ApiResult};
use crate::extractor::{AuthUser, PathId};
use crate::filters::{apply_ordering, ListParams};
use crate::models::{CommentPayload, CommentView};
use crate::pagination::{paginate, Page, COMMON_PAGINATION};
use crate::permissions::CommentOwner;
use crate::repository;
use crate::state::AppState;

const ORDERING_FIELDS: &[(&str, comment::Column)] = &[
    ("id", comment::Column::Id),
    ("created_at", comment::Column::CreatedAt),
    ("updated_at", comment::Column::UpdatedAt),
];

pub async fn list_comments(
    State(state): State<AppState>,
    PathId(feed_id): PathId<i32>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<CommentView>>> {
    let params = query_params(params)?;
    let mut q = comment::Entity::find().filter(comment::Column::FeedId.eq(feed_id));
    if let Some(user_id) = params.user_id()? {
        q = q.filter(comment::Column::UserId.eq(user_id));
    }
    let q = apply_ordering(
        q,
        params.ordering.as_deref(),
        ORDERING_FIELDS,
        (comment::Column::CreatedAt, Order::Asc),
    );

    let mut page = paginate(
        &state.db,
        q,
        params.page.as_deref(),
        params.page_size.as_deref(),
        COMMON_PAGINATION,
    )
    .await?;
    let comments = std::mem::take(&mut page.results);
    let views = repository::load_comment_views(&state.db, comments).await?;

    Ok(Json(page.with_results(views)))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(feed_id): PathId<i32>,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CommentView>)> {
    // The parent feed must exist before the payload is even looked at
    let f = repository::find_feed(&state.db, feed_id).await?;
    let new_comment = json_body(payload)?.into_valid()?;

    let now = chrono::Utc::now();
    let c = comment::ActiveModel {
        feed_id: Set(f.id),
        user_id: Set(auth.id),
        text: Set(new_comment.text),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!("User {} commented {} on feed {}", auth.id, c.id, f.id);

    let view = repository::fetch_comment_with_feed(&state.db, c.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathId(comment_id): PathId<i32>,
) -> ApiResult<Json<CommentView>> {
    let view = repository::fetch_comment_with_feed(&state.db, comment_id).await?;
    Ok(Json(view))
}

pub async fn update_comment(
    State(state): State<AppState>,
    owner: CommentOwner,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> ApiResult<Json<CommentView>> {
    let replacement = json_body(payload)?.into_valid()?;

    let comment_id = owner.comment.id;
    let mut c: comment::ActiveModel = owner.comment.into();
    c.text = Set(replacement.text);
    c.updated_at = Set(chrono::Utc::now());
    c.update(&state.db).await?;

    tracing::info!("User {} updated comment {}", owner.user.id, comment_id);

    let view = repository::fetch_comment_with_feed(&state.db, comment_id).await?;
    Ok(Json(view))
}
