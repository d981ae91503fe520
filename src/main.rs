use clap::Parser;
use tracing_subscriber::EnvFilter;

use feeds_server::routes::auth::MAX_TOKEN_TTL_DAYS;
use feeds_server::{app, db, state::AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// SQLite database URL
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:feeds.db?mode=rwc")]
    database_url: String,

    /// Lifetime of issued tokens, in days
    #[arg(
        long,
        env = "TOKEN_TTL_DAYS",
        default_value_t = 30,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_DAYS)
    )]
    token_ttl_days: i64,

    /// Require authentication to list feeds
    #[arg(long, env = "PRIVATE_FEED_LIST")]
    private_feed_list: bool,

    /// Only send the session cookie over HTTPS
    #[arg(long, env = "SECURE_COOKIES")]
    secure_cookies: bool,
}

/// JWT secret: from env, from file, or generate and save to file
fn load_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        return secret;
    }

    let secret_path = std::path::Path::new("jwt_secret.key");
    if let Ok(saved) = std::fs::read_to_string(secret_path) {
        let saved = saved.trim().to_string();
        if !saved.is_empty() {
            tracing::info!("Loaded JWT secret from jwt_secret.key");
            return saved;
        }
    }

    use rand::Rng;
    let secret: String = rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Err(e) = std::fs::write(secret_path, &secret) {
        tracing::warn!("Could not save JWT secret to file: {e}");
    } else {
        tracing::info!("Generated and saved JWT secret to jwt_secret.key");
    }
    secret
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("feeds_server=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let jwt_secret = load_jwt_secret();

    tracing::info!("Initializing database at {}", args.database_url);
    let db = db::init_pool(&args.database_url).await?;

    let state = AppState::new(db, jwt_secret)
        .with_token_ttl_days(args.token_ttl_days)
        .with_private_feed_list(args.private_feed_list)
        .with_secure_cookies(args.secure_cookies);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
