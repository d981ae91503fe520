//! Explicit lookups with batch eager loading. Every view builder issues one
//! query per association, never one per row.

use std::collections::BTreeMap;

use sea_orm::*;

use crate::entities::{comment, emotion, feed, feed_emotion, user};
use crate::error::{ApiError, ApiResult};
use crate::models::{CommentView, FeedView, UserInfo};

fn owner_info(owner: Option<user::Model>, user_id: i32) -> ApiResult<UserInfo> {
    owner
        .map(UserInfo::from)
        .ok_or_else(|| ApiError::Internal(format!("user {user_id} is missing")))
}

pub async fn find_feed<C: ConnectionTrait>(db: &C, feed_id: i32) -> ApiResult<feed::Model> {
    feed::Entity::find_by_id(feed_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn find_comment<C: ConnectionTrait>(db: &C, comment_id: i32) -> ApiResult<comment::Model> {
    comment::Entity::find_by_id(comment_id)
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

/// Look up an emotion only if it is linked to `feed_id`.
pub async fn find_feed_emotion<C: ConnectionTrait>(
    db: &C,
    feed_id: i32,
    emotion_id: i32,
) -> ApiResult<emotion::Model> {
    emotion::Entity::find_by_id(emotion_id)
        .inner_join(feed_emotion::Entity)
        .filter(feed_emotion::Column::FeedId.eq(feed_id))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

/// Render feeds with their owners and emotions, preserving input order.
pub async fn load_feed_views<C: ConnectionTrait>(
    db: &C,
    feeds: Vec<feed::Model>,
) -> ApiResult<Vec<FeedView>> {
    if feeds.is_empty() {
        return Ok(Vec::new());
    }

    let owners = feeds.load_one(user::Entity, db).await?;
    let emotions = feeds
        .load_many_to_many(
            emotion::Entity::find().order_by_asc(emotion::Column::Id),
            feed_emotion::Entity,
            db,
        )
        .await?;

    feeds
        .into_iter()
        .zip(owners)
        .zip(emotions)
        .map(|((f, owner), emotions)| {
            let owner = owner_info(owner, f.user_id)?;
            Ok(FeedView::new(f, owner, emotions))
        })
        .collect()
}

pub async fn fetch_feed_with_user_and_emotions<C: ConnectionTrait>(
    db: &C,
    feed_id: i32,
) -> ApiResult<FeedView> {
    let f = find_feed(db, feed_id).await?;
    load_feed_views(db, vec![f])
        .await?
        .pop()
        .ok_or(ApiError::NotFound)
}

/// Render comments with their author and their feed (plus the feed's owner
/// and emotions). Feeds shared by several comments are rendered once.
pub async fn load_comment_views<C: ConnectionTrait>(
    db: &C,
    comments: Vec<comment::Model>,
) -> ApiResult<Vec<CommentView>> {
    if comments.is_empty() {
        return Ok(Vec::new());
    }

    let authors = comments.load_one(user::Entity, db).await?;
    let feeds = comments.load_one(feed::Entity, db).await?;

    let unique: BTreeMap<i32, feed::Model> = feeds
        .into_iter()
        .flatten()
        .map(|f| (f.id, f))
        .collect();
    let feed_views: BTreeMap<i32, FeedView> = load_feed_views(db, unique.into_values().collect())
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();

    comments
        .into_iter()
        .zip(authors)
        .map(|(c, author)| {
            let author = owner_info(author, c.user_id)?;
            let feed = feed_views
                .get(&c.feed_id)
                .cloned()
                .ok_or_else(|| ApiError::Internal(format!("feed {} is missing", c.feed_id)))?;
            Ok(CommentView::new(c, feed, author))
        })
        .collect()
}

pub async fn fetch_comment_with_feed<C: ConnectionTrait>(
    db: &C,
    comment_id: i32,
) -> ApiResult<CommentView> {
    let c = find_comment(db, comment_id).await?;
    load_comment_views(db, vec![c])
        .await?
        .pop()
        .ok_or(ApiError::NotFound)
}
