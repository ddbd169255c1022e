pub mod recommendations;

// Re-export handlers for convenience
pub use recommendations::{
    get_recommendations, RecommendationHandlerState, RecommendationsResponse,
};
