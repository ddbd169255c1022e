// ============================================
// Similarity Scorer
// ============================================
//
// Pure weighted scoring over two plain profiles, no I/O.
//
// Factors:
// - Interest overlap (Jaccard similarity)
// - Goal-category overlap (Jaccard similarity)
// - Location proximity (city > country)
// - Mutual-friend boost (capped)

use std::collections::HashSet;
use uuid::Uuid;

use crate::models::{CandidateProfile, SuggestionCategory, UserProfile};

/// Factor weights. Sub-scores are fractions in [0, 1], so the total is
/// bounded by the weight sum: 100.
pub const INTEREST_WEIGHT: f64 = 40.0;
pub const GOAL_CATEGORY_WEIGHT: f64 = 30.0;
pub const LOCATION_WEIGHT: f64 = 20.0;
pub const MUTUAL_FRIENDS_WEIGHT: f64 = 10.0;

/// Mutual-friend count at which the boost saturates.
pub const MUTUAL_FRIENDS_CAP: usize = 10;

const FITNESS_TAGS: [&str; 5] = ["Fitness", "Running", "Yoga", "Swimming", "Cycling"];
const STUDY_TAGS: [&str; 5] = ["Programming", "Study", "Learning", "Reading", "Education"];
const CAREER_TAGS: [&str; 4] = ["Business", "Career", "Leadership", "Networking"];

/// Compute the weighted similarity score for one candidate.
///
/// Result is in [0, 100], rounded to one decimal place.
pub fn similarity_score(current: &UserProfile, candidate: &CandidateProfile) -> f64 {
    let interest = jaccard(&current.interests, &candidate.interests);
    let goal = jaccard(&current.goal_categories, &candidate.goal_categories);
    let location = location_affinity(
        current.city.as_deref(),
        current.country.as_deref(),
        candidate.city.as_deref(),
        candidate.country.as_deref(),
    );
    let mutual = mutual_friends_boost(mutual_friend_count(
        &current.friend_ids,
        &candidate.friend_ids,
    ));

    let score = INTEREST_WEIGHT * interest
        + GOAL_CATEGORY_WEIGHT * goal
        + LOCATION_WEIGHT * location
        + MUTUAL_FRIENDS_WEIGHT * mutual;

    round_one_decimal(score)
}

/// Number of friends the two users have in common, uncapped.
pub fn mutual_friend_count(current_friends: &[Uuid], candidate_friends: &[Uuid]) -> usize {
    let current_set: HashSet<Uuid> = current_friends.iter().copied().collect();
    candidate_friends
        .iter()
        .filter(|id| current_set.contains(id))
        .count()
}

/// Coarse label for a suggestion, from fixed tag sets tested in priority
/// order. First match wins; no match means "general".
pub fn categorize(interests: &[String]) -> SuggestionCategory {
    if intersects(interests, &FITNESS_TAGS) {
        SuggestionCategory::Fitness
    } else if intersects(interests, &STUDY_TAGS) {
        SuggestionCategory::Study
    } else if intersects(interests, &CAREER_TAGS) {
        SuggestionCategory::Career
    } else {
        SuggestionCategory::General
    }
}

pub fn round_one_decimal(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// Jaccard similarity over two tag lists; 0.0 when either side is empty.
fn jaccard(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let set_a: HashSet<&str> = a.iter().map(|s| s.as_str()).collect();
    let set_b: HashSet<&str> = b.iter().map(|s| s.as_str()).collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    intersection as f64 / union.max(1) as f64
}

/// 1.0 for a city match, 0.5 for a country match, 0.0 otherwise. Missing
/// fields on either side never match.
fn location_affinity(
    current_city: Option<&str>,
    current_country: Option<&str>,
    candidate_city: Option<&str>,
    candidate_country: Option<&str>,
) -> f64 {
    match (current_city, candidate_city) {
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => return 1.0,
        _ => {}
    }
    match (current_country, candidate_country) {
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => 0.5,
        _ => 0.0,
    }
}

/// Saturates at 1.0 once the intersection reaches the cap.
fn mutual_friends_boost(mutual_count: usize) -> f64 {
    mutual_count.min(MUTUAL_FRIENDS_CAP) as f64 / MUTUAL_FRIENDS_CAP as f64
}

fn intersects(interests: &[String], tags: &[&str]) -> bool {
    interests
        .iter()
        .any(|i| tags.iter().any(|t| t.eq_ignore_ascii_case(i)))
}
