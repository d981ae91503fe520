use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "feeds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::feed_emotion::Entity")]
    FeedEmotion,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::feed_emotion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeedEmotion.def()
    }
}

// Emotions are reached through the feed_emotions link table
impl Related<super::emotion::Entity> for Entity {
    fn to() -> RelationDef {
        super::feed_emotion::Relation::Emotion.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::feed_emotion::Relation::Feed.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
