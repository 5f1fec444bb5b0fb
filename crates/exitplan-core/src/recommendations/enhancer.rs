//! Extension point for post-processing the rule-based recommendations, e.g.
//! with an external advisory service. The engine itself ships only the
//! no-op implementation.

use crate::profile::NormalizedProfile;
use crate::recommendations::engine::Recommendation;
use crate::ExitPlanResult;

/// Rewrites or augments a ranked recommendation list.
pub trait RecommendationEnhancer: Send + Sync {
    /// Short identifier used in warnings and logs.
    fn name(&self) -> &str;

    fn enhance(
        &self,
        profile: &NormalizedProfile,
        recommendations: &[Recommendation],
    ) -> ExitPlanResult<Vec<Recommendation>>;
}

/// Returns the rule-based list untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnhancer;

impl RecommendationEnhancer for NoopEnhancer {
    fn name(&self) -> &str {
        "noop"
    }

    fn enhance(
        &self,
        _profile: &NormalizedProfile,
        recommendations: &[Recommendation],
    ) -> ExitPlanResult<Vec<Recommendation>> {
        Ok(recommendations.to_vec())
    }
}

/// Run `enhancer`, falling back to the original list (with a warning) if it
/// fails. Priorities are renumbered 1..n on the way out.
pub fn apply_enhancer(
    enhancer: &dyn RecommendationEnhancer,
    profile: &NormalizedProfile,
    recommendations: Vec<Recommendation>,
    warnings: &mut Vec<String>,
) -> Vec<Recommendation> {
    let mut out = match enhancer.enhance(profile, &recommendations) {
        Ok(enhanced) => enhanced,
        Err(e) => {
            tracing::warn!(enhancer = enhancer.name(), error = %e, "enhancement failed, using rule-based list");
            warnings.push(format!(
                "Enhancer '{}' unavailable ({e}); using rule-based recommendations",
                enhancer.name()
            ));
            recommendations
        }
    };
    for (i, rec) in out.iter_mut().enumerate() {
        rec.priority = i as u32 + 1;
    }
    out
}
