/// Friend-request lookup backed by Postgres.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::FriendRequestLookup;
use crate::error::Result;
use crate::models::{FriendRequestParties, FriendRequestStatus};

pub struct PgFriendRequestLookup {
    pool: PgPool,
}

impl PgFriendRequestLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendRequestLookup for PgFriendRequestLookup {
    async fn open_requests_involving(&self, user_id: Uuid) -> Result<Vec<FriendRequestParties>> {
        let parties = sqlx::query_as::<_, FriendRequestParties>(
            r#"
            SELECT sender_id, recipient_id
            FROM friend_requests
            WHERE (sender_id = $1 OR recipient_id = $1)
              AND status IN ($2, $3)
            "#,
        )
        .bind(user_id)
        .bind(FriendRequestStatus::Pending)
        .bind(FriendRequestStatus::Accepted)
        .fetch_all(&self.pool)
        .await?;

        Ok(parties)
    }
}
