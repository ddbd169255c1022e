use actix_web::{web, App, HttpServer};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use friend_recommendation_service::config::Config;
use friend_recommendation_service::db::{self, PgFriendRequestLookup, PgUserDirectory};
use friend_recommendation_service::handlers::{get_recommendations, RecommendationHandlerState};
use friend_recommendation_service::services::recommendation::RecommendationService;
use friend_recommendation_service::services::storage::{build_s3_client, S3AvatarResolver};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!(
        "Starting friend-recommendation-service v{}",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database
    let pool = db::create_pool(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to create database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(
        "Database pool created with {} max connections",
        config.database.max_connections
    );

    // Initialize object storage for avatar presigning
    let s3_client = build_s3_client(&config.s3)
        .await
        .expect("Failed to build S3 client");
    let avatars = Arc::new(S3AvatarResolver::new(s3_client, &config.s3));

    // Wire up the recommendation service
    let service = Arc::new(RecommendationService::new(
        Arc::new(PgUserDirectory::new(pool.clone())),
        Arc::new(PgFriendRequestLookup::new(pool)),
        avatars,
    ));
    let handler_state = web::Data::new(RecommendationHandlerState { service });

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(handler_state.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .service(get_recommendations)
    })
    .bind(bind_addr)?
    .run()
    .await
}
