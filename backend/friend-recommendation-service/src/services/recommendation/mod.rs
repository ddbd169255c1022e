//! Friend-recommendation ranking pipeline.
//!
//! Read-only over the user, goal, friendship and friend-request stores.
//! The pipeline degrades instead of failing: any downstream error after the
//! requester has been identified produces a generic fallback list, never an
//! error to the caller.

pub mod scorer;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::{FriendRequestLookup, UserDirectory};
use crate::error::{AppError, Result};
use crate::models::{CandidateProfile, FriendSuggestion, SuggestionCategory, UserProfile};
use crate::services::storage::AvatarResolver;

/// Ranked results are truncated to this length.
pub const MAX_SUGGESTIONS: usize = 20;
/// Sparse results are backfilled up to this length.
pub const MIN_SUGGESTIONS: usize = 5;
/// Size of the degraded result set when the primary pipeline fails.
pub const FALLBACK_LIMIT: usize = 6;
/// Score carried by backfilled and fallback entries.
pub const GENERIC_SCORE: f64 = 1.0;

/// Candidates fetched per request. With the 20-result cap a larger pool only
/// changes which ties are dropped.
const CANDIDATE_POOL_LIMIT: i64 = 500;

/// Outcome of one ranking run. `Fallback` carries the degraded generic list
/// produced when the primary pipeline failed downstream.
#[derive(Debug)]
pub enum RecommendationOutcome {
    Ranked(Vec<FriendSuggestion>),
    Fallback(Vec<FriendSuggestion>),
}

impl RecommendationOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, RecommendationOutcome::Fallback(_))
    }

    pub fn suggestions(&self) -> &[FriendSuggestion] {
        match self {
            RecommendationOutcome::Ranked(list) | RecommendationOutcome::Fallback(list) => list,
        }
    }

    pub fn into_suggestions(self) -> Vec<FriendSuggestion> {
        match self {
            RecommendationOutcome::Ranked(list) | RecommendationOutcome::Fallback(list) => list,
        }
    }
}

pub struct RecommendationService {
    users: Arc<dyn UserDirectory>,
    requests: Arc<dyn FriendRequestLookup>,
    avatars: Arc<dyn AvatarResolver>,
}

impl RecommendationService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        requests: Arc<dyn FriendRequestLookup>,
        avatars: Arc<dyn AvatarResolver>,
    ) -> Self {
        Self {
            users,
            requests,
            avatars,
        }
    }

    /// Produce ranked friend suggestions for `user_id`.
    ///
    /// Errors only when the requester does not exist. Every downstream
    /// failure is absorbed into a `Fallback` outcome.
    pub async fn recommendations_for(&self, user_id: Uuid) -> Result<RecommendationOutcome> {
        let current = match self.users.find_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                return Err(AppError::NotFound(format!("User {} not found", user_id)));
            }
            Err(e) => {
                warn!(
                    "Profile lookup failed for user {}: {}, serving fallback suggestions",
                    user_id, e
                );
                return Ok(RecommendationOutcome::Fallback(
                    self.degraded_suggestions(user_id).await,
                ));
            }
        };

        match self.ranked_suggestions(&current).await {
            Ok(mut suggestions) => {
                self.resolve_avatars(&mut suggestions).await;
                Ok(RecommendationOutcome::Ranked(suggestions))
            }
            Err(e) => {
                warn!(
                    "Recommendation pipeline failed for user {}: {}, serving fallback suggestions",
                    user_id, e
                );
                Ok(RecommendationOutcome::Fallback(
                    self.degraded_suggestions(user_id).await,
                ))
            }
        }
    }

    /// Primary path: eligibility filter, scoring, ranking, backfill.
    async fn ranked_suggestions(&self, current: &UserProfile) -> Result<Vec<FriendSuggestion>> {
        // Exclusion set: self, existing friends, and every party to an open
        // (pending or accepted) friend request involving the requester.
        let open_requests = self.requests.open_requests_involving(current.id).await?;

        let mut excluded: HashSet<Uuid> = HashSet::new();
        excluded.insert(current.id);
        excluded.extend(current.friend_ids.iter().copied());
        for request in &open_requests {
            excluded.insert(request.sender_id);
            excluded.insert(request.recipient_id);
        }

        let exclude_ids: Vec<Uuid> = excluded.iter().copied().collect();
        let candidates = self
            .users
            .find_scoring_candidates(&exclude_ids, CANDIDATE_POOL_LIMIT)
            .await?;
        let pool_size = candidates.len();

        let mut suggestions: Vec<FriendSuggestion> = candidates
            .into_iter()
            .map(|candidate| scored_suggestion(current, candidate))
            .collect();

        // Descending by score; NaN cannot occur but ordering stays total.
        suggestions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        suggestions.truncate(MAX_SUGGESTIONS);

        if suggestions.len() < MIN_SUGGESTIONS {
            let needed = MIN_SUGGESTIONS - suggestions.len();
            let mut seen = exclude_ids;
            seen.extend(suggestions.iter().map(|s| s.user_id));

            let extra = self
                .users
                .find_backfill_candidates(&seen, needed as i64)
                .await?;
            suggestions.extend(extra.into_iter().map(generic_suggestion));
        }

        info!(
            user_id = %current.id,
            pool_size = pool_size,
            returned = suggestions.len(),
            "Friend suggestions ranked"
        );

        Ok(suggestions)
    }

    /// Degraded path: up to `FALLBACK_LIMIT` arbitrary active non-admin
    /// users, excluding only the requester. Its own failure yields an empty
    /// list rather than an error.
    async fn degraded_suggestions(&self, user_id: Uuid) -> Vec<FriendSuggestion> {
        let mut suggestions = match self
            .users
            .find_backfill_candidates(&[user_id], FALLBACK_LIMIT as i64)
            .await
        {
            Ok(users) => users.into_iter().map(generic_suggestion).collect(),
            Err(e) => {
                error!(
                    "Fallback suggestion query failed for user {}: {}, returning empty list",
                    user_id, e
                );
                Vec::new()
            }
        };

        self.resolve_avatars(&mut suggestions).await;
        suggestions
    }

    /// Swap avatar storage keys for presigned URLs, one result at a time.
    /// Values already carrying a URL scheme pass through untouched; a failed
    /// resolution drops that one URL only.
    async fn resolve_avatars(&self, suggestions: &mut [FriendSuggestion]) {
        for suggestion in suggestions.iter_mut() {
            let Some(raw) = suggestion.avatar_url.take() else {
                continue;
            };

            if raw.starts_with("http://") || raw.starts_with("https://") {
                suggestion.avatar_url = Some(raw);
                continue;
            }

            match self.avatars.resolve_url(&raw).await {
                Ok(url) => suggestion.avatar_url = Some(url),
                Err(e) => {
                    warn!("Failed to presign avatar key {}: {}", raw, e);
                }
            }
        }
    }
}

/// Full suggestion for a scored candidate. The avatar field still holds the
/// raw key or URL at this point; resolution happens as a separate pass.
fn scored_suggestion(current: &UserProfile, candidate: CandidateProfile) -> FriendSuggestion {
    let score = scorer::similarity_score(current, &candidate);
    let mutual_friends =
        scorer::mutual_friend_count(&current.friend_ids, &candidate.friend_ids);
    let category = scorer::categorize(&candidate.interests);

    FriendSuggestion {
        user_id: candidate.id,
        display_name: candidate.display_name,
        email: candidate.email,
        username: candidate.username,
        avatar_url: candidate.avatar_key,
        interests: candidate.interests,
        mutual_friends,
        score,
        bio: candidate.bio,
        category,
    }
}

/// Backfill/fallback suggestion: no computed similarity.
fn generic_suggestion(candidate: CandidateProfile) -> FriendSuggestion {
    FriendSuggestion {
        user_id: candidate.id,
        display_name: candidate.display_name,
        email: candidate.email,
        username: candidate.username,
        avatar_url: candidate.avatar_key,
        interests: candidate.interests,
        mutual_friends: 0,
        score: GENERIC_SCORE,
        bio: candidate.bio,
        category: SuggestionCategory::General,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(username: &str) -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            email: format!("{username}@example.com"),
            username: username.to_string(),
            display_name: username.to_string(),
            bio: None,
            avatar_key: Some("avatars/a.png".to_string()),
            interests: vec!["Fitness".to_string()],
            goal_categories: Vec::new(),
            city: None,
            country: None,
            friend_ids: Vec::new(),
        }
    }

    #[test]
    fn test_generic_suggestion_carries_unit_score_and_general_category() {
        let suggestion = generic_suggestion(candidate("sam"));
        assert_eq!(suggestion.score, GENERIC_SCORE);
        assert_eq!(suggestion.category, SuggestionCategory::General);
        assert_eq!(suggestion.mutual_friends, 0);
    }

    #[test]
    fn test_outcome_accessors() {
        let ranked = RecommendationOutcome::Ranked(vec![generic_suggestion(candidate("a"))]);
        assert!(!ranked.is_degraded());
        assert_eq!(ranked.suggestions().len(), 1);

        let fallback = RecommendationOutcome::Fallback(Vec::new());
        assert!(fallback.is_degraded());
        assert!(fallback.into_suggestions().is_empty());
    }

    #[test]
    fn test_scored_suggestion_keeps_raw_avatar_value() {
        let current = UserProfile {
            id: Uuid::new_v4(),
            interests: Vec::new(),
            goal_categories: Vec::new(),
            city: None,
            country: None,
            friend_ids: Vec::new(),
        };
        let suggestion = scored_suggestion(&current, candidate("kim"));
        assert_eq!(suggestion.avatar_url.as_deref(), Some("avatars/a.png"));
        assert_eq!(suggestion.category, SuggestionCategory::Fitness);
    }
}
