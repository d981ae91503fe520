use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use sea_orm::*;

use crate::entities::feed;
use crate::error::{json_body, query_params, ApiError, ApiResult};
use crate::extractor::{AuthUser, PathId};
use crate::filters::{apply_ordering, ListParams};
use crate::models::{FeedPayload, FeedView};
use crate::pagination::{paginate, Page, FEED_PAGINATION};
use crate::repository;
use crate::state::AppState;

const ORDERING_FIELDS: &[(&str, feed::Column)] = &[
    ("id", feed::Column::Id),
    ("created_at", feed::Column::CreatedAt),
    ("updated_at", feed::Column::UpdatedAt),
];

pub async fn list_feeds(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<FeedView>>> {
    let params = query_params(params)?;
    if state.private_feed_list && auth.is_none() {
        return Err(ApiError::Unauthorized(
            "Authentication credentials were not provided.".into(),
        ));
    }

    let mut q = feed::Entity::find();
    if let Some(user_id) = params.user_id()? {
        q = q.filter(feed::Column::UserId.eq(user_id));
    }
    let q = apply_ordering(
        q,
        params.ordering.as_deref(),
        ORDERING_FIELDS,
        (feed::Column::CreatedAt, Order::Desc),
    );

    let mut page = paginate(
        &state.db,
        q,
        params.page.as_deref(),
        params.page_size.as_deref(),
        FEED_PAGINATION,
    )
    .await?;
    let feeds = std::mem::take(&mut page.results);
    let views = repository::load_feed_views(&state.db, feeds).await?;

    Ok(Json(page.with_results(views)))
}

pub async fn create_feed(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<FeedPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FeedView>)> {
    let new_feed = json_body(payload)?.into_valid()?;

    let now = chrono::Utc::now();
    let f = feed::ActiveModel {
        user_id: Set(auth.id),
        content: Set(new_feed.content),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!("User {} created feed {}", auth.id, f.id);

    let view = repository::load_feed_views(&state.db, vec![f])
        .await?
        .pop()
        .ok_or(ApiError::NotFound)?;

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_feed(
    State(state): State<AppState>,
    _auth: AuthUser,
    PathId(feed_id): PathId<i32>,
) -> ApiResult<Json<FeedView>> {
    let view = repository::fetch_feed_with_user_and_emotions(&state.db, feed_id).await?;
    Ok(Json(view))
}
