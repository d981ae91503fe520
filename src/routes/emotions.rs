use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use sea_orm::*;

use crate::entities::{emotion, feed, feed_emotion};
use crate::error::{json_body, query_params, ApiResult};
use crate::extractor::{AuthUser, PathId};
use crate::filters::ListParams;
use crate::models::{EmotionPayload, EmotionView};
use crate::pagination::{paginate, Page, COMMON_PAGINATION};
use crate::repository;
use crate::state::AppState;

pub async fn list_emotions(
    State(state): State<AppState>,
    PathId(feed_id): PathId<i32>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<EmotionView>>> {
    let f = repository::find_feed(&state.db, feed_id).await?;
    let params = query_params(params)?;

    let mut q = emotion::Entity::find()
        .inner_join(feed_emotion::Entity)
        .filter(feed_emotion::Column::FeedId.eq(f.id));
    if let Some(user_id) = params.user_id()? {
        q = q.filter(emotion::Column::UserId.eq(user_id));
    }
    let q = q.order_by_asc(emotion::Column::Id);

    let mut page = paginate(
        &state.db,
        q,
        params.page.as_deref(),
        params.page_size.as_deref(),
        COMMON_PAGINATION,
    )
    .await?;
    let views = page.results.drain(..).map(EmotionView::from).collect();

    Ok(Json(page.with_results(views)))
}

pub async fn create_emotion(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId(feed_id): PathId<i32>,
    payload: Result<Json<EmotionPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EmotionView>)> {
    let f = repository::find_feed(&state.db, feed_id).await?;
    let kind = json_body(payload)?.into_valid()?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let e = emotion::ActiveModel {
        user_id: Set(auth.id),
        kind: Set(kind.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    feed_emotion::Entity::insert(feed_emotion::ActiveModel {
        feed_id: Set(f.id),
        emotion_id: Set(e.id),
    })
    .exec(&txn)
    .await?;

    // Attaching an emotion re-saves the feed
    let mut f: feed::ActiveModel = f.into();
    f.updated_at = Set(now);
    let f = f.update(&txn).await?;

    txn.commit().await?;

    tracing::info!("User {} added {} emotion {} to feed {}", auth.id, kind, e.id, f.id);

    Ok((StatusCode::CREATED, Json(e.into())))
}

pub async fn update_emotion(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId((feed_id, emotion_id)): PathId<(i32, i32)>,
    payload: Result<Json<EmotionPayload>, JsonRejection>,
) -> ApiResult<Json<EmotionView>> {
    let f = repository::find_feed(&state.db, feed_id).await?;
    let kind = json_body(payload)?.into_valid()?;
    let e = repository::find_feed_emotion(&state.db, f.id, emotion_id).await?;

    let mut e: emotion::ActiveModel = e.into();
    e.kind = Set(kind.to_string());
    e.updated_at = Set(chrono::Utc::now());
    let e = e.update(&state.db).await?;

    tracing::info!("User {} changed emotion {} on feed {} to {}", auth.id, e.id, f.id, kind);

    Ok(Json(e.into()))
}

pub async fn delete_emotion(
    State(state): State<AppState>,
    auth: AuthUser,
    PathId((feed_id, emotion_id)): PathId<(i32, i32)>,
) -> ApiResult<StatusCode> {
    let f = repository::find_feed(&state.db, feed_id).await?;
    let e = repository::find_feed_emotion(&state.db, f.id, emotion_id).await?;

    let txn = state.db.begin().await?;
    feed_emotion::Entity::delete_many()
        .filter(feed_emotion::Column::EmotionId.eq(e.id))
        .exec(&txn)
        .await?;
    emotion::Entity::delete_by_id(e.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!("User {} deleted emotion {} from feed {}", auth.id, e.id, f.id);

    Ok(StatusCode::NO_CONTENT)
}
