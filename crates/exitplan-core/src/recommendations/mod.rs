pub mod engine;
pub mod enhancer;
pub mod roi;
pub mod timeline;

pub use engine::{calculate_recommendations, recommend, Recommendation, RecommendationSet};
pub use enhancer::{NoopEnhancer, RecommendationEnhancer};
pub use timeline::{calculate_timeline, optimal_timeline, ExitTimeline};
