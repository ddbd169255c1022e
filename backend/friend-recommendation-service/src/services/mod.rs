pub mod recommendation;
pub mod storage;

pub use recommendation::{RecommendationOutcome, RecommendationService};
pub use storage::{build_s3_client, AvatarResolver, S3AvatarResolver};
