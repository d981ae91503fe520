pub mod auth;
pub mod comments;
pub mod emotions;
pub mod feeds;
