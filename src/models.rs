use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::{comment, emotion, feed, user};
use crate::error::{ApiError, ApiResult, FieldErrors};

const REQUIRED: &str = "This field is required.";

// ─── Emotion kinds ───

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionKind {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl EmotionKind {
    pub const ALL: [EmotionKind; 6] = [
        EmotionKind::Like,
        EmotionKind::Love,
        EmotionKind::Haha,
        EmotionKind::Wow,
        EmotionKind::Sad,
        EmotionKind::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionKind::Like => "like",
            EmotionKind::Love => "love",
            EmotionKind::Haha => "haha",
            EmotionKind::Wow => "wow",
            EmotionKind::Sad => "sad",
            EmotionKind::Angry => "angry",
        }
    }
}

impl fmt::Display for EmotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("\"{s}\" is not a valid choice."))
    }
}

fn validate_emotion_kind(kind: &str) -> Result<(), ValidationError> {
    kind.parse::<EmotionKind>()
        .map(|_| ())
        .map_err(|msg| ValidationError::new("invalid_choice").with_message(msg.into()))
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username")
            .with_message("Username can only contain letters, numbers, _ and -".into()))
    }
}

/// Run the derived validator, then pull the required value out of its `Option`.
fn validated<P: Validate, T>(payload: &P, value: Option<T>, field: &str) -> ApiResult<T> {
    payload.validate()?;
    value.ok_or_else(|| ApiError::Validation(FieldErrors::single(field, REQUIRED)))
}

// ─── Request payloads ───

#[derive(Debug, Default, Deserialize, Validate)]
pub struct FeedPayload {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 2000, message = "Content must be 1-2000 characters.")
    )]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeed {
    pub content: String,
}

impl FeedPayload {
    pub fn into_valid(self) -> ApiResult<NewFeed> {
        let content = validated(&self, self.content.clone(), "content")?;
        Ok(NewFeed { content })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CommentPayload {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, max = 1000, message = "Text must be 1-1000 characters.")
    )]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
}

impl CommentPayload {
    pub fn into_valid(self) -> ApiResult<NewComment> {
        let text = validated(&self, self.text.clone(), "text")?;
        Ok(NewComment { text })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct EmotionPayload {
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_emotion_kind")
    )]
    pub kind: Option<String>,
}

impl EmotionPayload {
    pub fn into_valid(self) -> ApiResult<EmotionKind> {
        let kind = validated(&self, self.kind.clone(), "kind")?;
        kind.parse()
            .map_err(|msg: String| ApiError::Validation(FieldErrors::single("kind", msg)))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 3, max = 32, message = "Username must be 3-32 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 32, message = "Display name must be 1-32 characters"))]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ─── Response views ───

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub display_name: String,
}

impl From<user::Model> for UserInfo {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            display_name: u.display_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionView {
    pub id: i32,
    pub user_id: i32,
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<emotion::Model> for EmotionView {
    fn from(e: emotion::Model) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            kind: e.kind,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedView {
    pub id: i32,
    pub user: UserInfo,
    pub content: String,
    pub emotions: Vec<EmotionView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeedView {
    pub fn new(feed: feed::Model, owner: UserInfo, emotions: Vec<emotion::Model>) -> Self {
        Self {
            id: feed.id,
            user: owner,
            content: feed.content,
            emotions: emotions.into_iter().map(EmotionView::from).collect(),
            created_at: feed.created_at,
            updated_at: feed.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i32,
    pub feed: FeedView,
    pub user: UserInfo,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: comment::Model, feed: FeedView, author: UserInfo) -> Self {
        Self {
            id: comment.id,
            feed,
            user: author,
            text: comment.text,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}
