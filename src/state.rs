use sea_orm::DatabaseConnection;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Lifetime of issued tokens and session cookies
    pub token_ttl_days: i64,
    /// Require authentication on `GET /api/feeds`
    pub private_feed_list: bool,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(db: DatabaseConnection, jwt_secret: String) -> Self {
        Self {
            db,
            jwt_secret,
            token_ttl_days: 30,
            private_feed_list: false,
            secure_cookies: false,
        }
    }

    pub fn with_token_ttl_days(mut self, days: i64) -> Self {
        self.token_ttl_days = days;
        self
    }

    pub fn with_private_feed_list(mut self, private: bool) -> Self {
        self.private_feed_list = private;
        self
    }

    pub fn with_secure_cookies(mut self, secure: bool) -> Self {
        self.secure_cookies = secure;
        self
    }
}
