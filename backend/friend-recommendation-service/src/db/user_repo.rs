/// User directory backed by Postgres.
///
/// Goal categories and friend ids are folded into per-row arrays here so the
/// scorer works over plain in-memory records instead of pushing the scoring
/// math into the database.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::UserDirectory;
use crate::error::Result;
use crate::models::{CandidateProfile, UserProfile};

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT u.id,
                   u.interests,
                   COALESCE(array_agg(DISTINCT g.category) FILTER (WHERE g.category IS NOT NULL), ARRAY[]::text[]) AS goal_categories,
                   u.city,
                   u.country,
                   COALESCE(array_agg(DISTINCT f.friend_id) FILTER (WHERE f.friend_id IS NOT NULL), ARRAY[]::uuid[]) AS friend_ids
            FROM users u
            LEFT JOIN goals g ON g.user_id = u.id
            LEFT JOIN friendships f ON f.user_id = u.id
            WHERE u.id = $1
            GROUP BY u.id
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn find_scoring_candidates(
        &self,
        exclude: &[Uuid],
        limit: i64,
    ) -> Result<Vec<CandidateProfile>> {
        // Scoring pool: only users with at least one interest tag carry a
        // personalization signal worth ranking.
        let candidates = sqlx::query_as::<_, CandidateProfile>(
            r#"
            SELECT u.id,
                   u.email,
                   u.username,
                   u.display_name,
                   u.bio,
                   u.avatar_key,
                   u.interests,
                   COALESCE(array_agg(DISTINCT g.category) FILTER (WHERE g.category IS NOT NULL), ARRAY[]::text[]) AS goal_categories,
                   u.city,
                   u.country,
                   COALESCE(array_agg(DISTINCT f.friend_id) FILTER (WHERE f.friend_id IS NOT NULL), ARRAY[]::uuid[]) AS friend_ids
            FROM users u
            LEFT JOIN goals g ON g.user_id = u.id
            LEFT JOIN friendships f ON f.user_id = u.id
            WHERE u.is_active = TRUE
              AND u.role <> 'admin'
              AND u.id <> ALL($1)
              AND cardinality(u.interests) > 0
            GROUP BY u.id
            ORDER BY u.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch scoring candidates: {}", e);
            crate::error::AppError::Database(format!("Failed to fetch candidates: {}", e))
        })?;

        Ok(candidates)
    }

    async fn find_backfill_candidates(
        &self,
        exclude: &[Uuid],
        limit: i64,
    ) -> Result<Vec<CandidateProfile>> {
        let candidates = sqlx::query_as::<_, CandidateProfile>(
            r#"
            SELECT u.id,
                   u.email,
                   u.username,
                   u.display_name,
                   u.bio,
                   u.avatar_key,
                   u.interests,
                   COALESCE(array_agg(DISTINCT g.category) FILTER (WHERE g.category IS NOT NULL), ARRAY[]::text[]) AS goal_categories,
                   u.city,
                   u.country,
                   COALESCE(array_agg(DISTINCT f.friend_id) FILTER (WHERE f.friend_id IS NOT NULL), ARRAY[]::uuid[]) AS friend_ids
            FROM users u
            LEFT JOIN goals g ON g.user_id = u.id
            LEFT JOIN friendships f ON f.user_id = u.id
            WHERE u.is_active = TRUE
              AND u.role <> 'admin'
              AND u.id <> ALL($1)
            GROUP BY u.id
            ORDER BY u.created_at DESC
            LIMIT $2
            "#,
        )
        .bind(exclude)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch backfill candidates: {}", e);
            crate::error::AppError::Database(format!("Failed to fetch candidates: {}", e))
        })?;

        Ok(candidates)
    }
}
