use actix_web::{get, web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::models::FriendSuggestion;
use crate::services::recommendation::RecommendationService;

pub struct RecommendationHandlerState {
    pub service: Arc<RecommendationService>,
}

/// Friend suggestions response
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub suggestions: Vec<FriendSuggestion>,
    pub count: usize,
    /// True when the list came from the degraded fallback path instead of
    /// the ranked pipeline. Default consumers can ignore it.
    pub degraded: bool,
}

/// GET /api/v1/recommendations/{user_id}
///
/// Ranked friend suggestions for a user, at most 20, backfilled to 5 when
/// the eligible pool allows. Returns 404 only when the user does not exist;
/// downstream faults degrade to generic suggestions instead of erroring.
#[get("/api/v1/recommendations/{user_id}")]
pub async fn get_recommendations(
    path: web::Path<Uuid>,
    state: web::Data<RecommendationHandlerState>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();

    debug!("Friend recommendations request: user={}", user_id);

    let outcome = state.service.recommendations_for(user_id).await?;
    let degraded = outcome.is_degraded();
    let suggestions = outcome.into_suggestions();
    let count = suggestions.len();

    debug!(
        "Friend recommendations response: user={} count={} degraded={}",
        user_id, count, degraded
    );

    Ok(HttpResponse::Ok().json(RecommendationsResponse {
        suggestions,
        count,
        degraded,
    }))
}
