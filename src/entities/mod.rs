pub mod comment;
pub mod emotion;
pub mod feed;
pub mod feed_emotion;
pub mod user;
