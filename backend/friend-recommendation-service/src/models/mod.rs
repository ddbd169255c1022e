use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Profile fields the ranker reads for the requesting user.
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub interests: Vec<String>,
    pub goal_categories: Vec<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub friend_ids: Vec<Uuid>,
}

/// A user being evaluated as a potential friend suggestion.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_key: Option<String>,
    pub interests: Vec<String>,
    pub goal_categories: Vec<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub friend_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "friend_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Declined,
}

/// Sender/recipient pair of an open (pending or accepted) friend request.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct FriendRequestParties {
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
}

/// Coarse label attached to each suggestion, derived from interests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Fitness,
    Study,
    Career,
    General,
}

/// One ranked (or backfilled, or fallback) friend suggestion.
///
/// Ephemeral: computed fresh per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendSuggestion {
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub interests: Vec<String>,
    /// Uncapped, for display ("N mutual friends").
    pub mutual_friends: usize,
    /// Weighted similarity in [0, 100], one decimal place.
    pub score: f64,
    pub bio: Option<String>,
    pub category: SuggestionCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SuggestionCategory::Fitness).unwrap(),
            "\"fitness\""
        );
        assert_eq!(
            serde_json::to_string(&SuggestionCategory::General).unwrap(),
            "\"general\""
        );
    }

    #[test]
    fn test_friend_suggestion_serialization() {
        let suggestion = FriendSuggestion {
            user_id: Uuid::new_v4(),
            display_name: "Jordan".to_string(),
            email: "jordan@example.com".to_string(),
            username: "jordan".to_string(),
            avatar_url: None,
            interests: vec!["Fitness".to_string()],
            mutual_friends: 3,
            score: 53.3,
            bio: None,
            category: SuggestionCategory::Fitness,
        };

        let json = serde_json::to_string(&suggestion).unwrap();
        assert!(json.contains("user_id"));
        assert!(json.contains("mutual_friends"));
        assert!(json.contains("\"category\":\"fitness\""));
    }
}
