pub mod friend_request_repo;
pub mod user_repo;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CandidateProfile, FriendRequestParties, UserProfile};

pub use friend_request_repo::PgFriendRequestLookup;
pub use user_repo::PgUserDirectory;

/// Create the Postgres connection pool.
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    Ok(pool)
}

/// Apply pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| crate::error::AppError::Database(e.to_string()))?;
    Ok(())
}

/// Read side of the user store consumed by the ranker.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Load the requester's comparison baseline. `None` when no such user.
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>>;

    /// Fetch active, non-admin candidates not in `exclude` that carry at
    /// least one interest tag, with the interests, goal categories, location
    /// and friend ids the scorer needs.
    async fn find_scoring_candidates(
        &self,
        exclude: &[Uuid],
        limit: i64,
    ) -> Result<Vec<CandidateProfile>>;

    /// Fetch any active, non-admin users not in `exclude`. Used for backfill
    /// and for the degraded fallback path, where no personalization signal
    /// is required.
    async fn find_backfill_candidates(
        &self,
        exclude: &[Uuid],
        limit: i64,
    ) -> Result<Vec<CandidateProfile>>;
}

/// Read side of the friend-request store.
#[async_trait]
pub trait FriendRequestLookup: Send + Sync {
    /// Sender/recipient pairs of every pending or accepted request the user
    /// is a party to. Declined requests are not returned.
    async fn open_requests_involving(&self, user_id: Uuid) -> Result<Vec<FriendRequestParties>>;
}
