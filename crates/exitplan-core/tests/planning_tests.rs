use exitplan_core::analysis::{analyze_business, AnalysisRequest};
use exitplan_core::assessment::calculate_position;
use exitplan_core::readiness::{calculate_readiness, ReadinessInput, ReadinessLevel};
use exitplan_core::recommendations::roi::OpportunityKind;
use exitplan_core::recommendations::{
    calculate_recommendations, calculate_timeline, NoopEnhancer, Recommendation,
    RecommendationEnhancer,
};
use exitplan_core::{
    BusinessProfile, EngineConfig, ExitPlanError, ExitPlanResult, NormalizedProfile,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn example_profile() -> BusinessProfile {
    BusinessProfile {
        revenue: dec!(2500000),
        profit_margin: dec!(12),
        employees: Some(25),
        industry: "professional-services".into(),
        owner_centricity_score: Some(dec!(45)),
        top_customer_percentage: Some(dec!(35)),
        wealth_gap: Some(dec!(200000)),
        ..Default::default()
    }
}

// ===========================================================================
// Position assessment
// ===========================================================================

#[test]
fn test_position_scores_bounded() {
    let cfg = EngineConfig::default();
    for centricity in [dec!(0), dec!(45), dec!(100)] {
        for top in [dec!(5), dec!(35), dec!(90)] {
            let mut p = example_profile();
            p.owner_centricity_score = Some(centricity);
            p.top_customer_percentage = Some(top);
            let s = calculate_position(&p, &cfg).unwrap().result;
            for score in [
                s.revenue_strength.score,
                s.profitability.score,
                s.operational_independence.score,
                s.customer_portfolio.score,
                s.management_capability.score,
                s.financial_controls.score,
                s.competitive_position.score,
                s.growth_potential.score,
            ] {
                assert!(
                    (Decimal::ZERO..=dec!(100)).contains(&score),
                    "score {score} out of range"
                );
            }
        }
    }
}

#[test]
fn test_high_dependency_is_flagged() {
    let mut p = example_profile();
    p.owner_centricity_score = Some(dec!(20));
    let s = calculate_position(&p, &EngineConfig::default()).unwrap().result;
    let first = &s.operational_independence.action_items[0];
    assert_eq!(first.action, "Reduce Owner Dependency");
    assert_eq!(first.specifics[0], "Hire General Manager/COO immediately");

    p.owner_centricity_score = Some(dec!(80));
    let better = calculate_position(&p, &EngineConfig::default()).unwrap().result;
    assert!(better.operational_independence.score > s.operational_independence.score);
}

// ===========================================================================
// Recommendations
// ===========================================================================

#[test]
fn test_recommendations_for_example() {
    let out = calculate_recommendations(&example_profile(), &EngineConfig::default(), &NoopEnhancer)
        .unwrap();
    let recs = &out.result.recommendations;
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0].kind, OpportunityKind::FinancialPerformance);
    // management clears no threshold at 150% ROI
    assert!(recs
        .iter()
        .all(|r| r.kind != OpportunityKind::ManagementDevelopment));
    let priorities: Vec<u32> = recs.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![1, 2, 3]);
}

#[test]
fn test_strong_business_needs_nothing() {
    let profile = BusinessProfile {
        revenue: dec!(5000000),
        profit_margin: dec!(30),
        employees: Some(60),
        industry: "technology".into(),
        owner_centricity_score: Some(dec!(95)),
        top_customer_percentage: Some(dec!(5)),
        process_documentation: Some(dec!(95)),
        ..Default::default()
    };
    let out = calculate_recommendations(&profile, &EngineConfig::default(), &NoopEnhancer).unwrap();
    assert!(out.result.recommendations.is_empty());
    assert_eq!(out.result.total_investment, Decimal::ZERO);
    assert!(out.warnings.iter().any(|w| w.contains("ROI threshold")));
}

struct BrokenEnhancer;

impl RecommendationEnhancer for BrokenEnhancer {
    fn name(&self) -> &str {
        "broken"
    }

    fn enhance(
        &self,
        _profile: &NormalizedProfile,
        _recommendations: &[Recommendation],
    ) -> ExitPlanResult<Vec<Recommendation>> {
        Err(ExitPlanError::Enhancement("upstream unavailable".into()))
    }
}

#[test]
fn test_enhancer_failure_keeps_rule_based_output() {
    let cfg = EngineConfig::default();
    let plain = calculate_recommendations(&example_profile(), &cfg, &NoopEnhancer).unwrap();
    let fallback = calculate_recommendations(&example_profile(), &cfg, &BrokenEnhancer).unwrap();
    let kinds = |rs: &[Recommendation]| rs.iter().map(|r| r.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds(&plain.result.recommendations),
        kinds(&fallback.result.recommendations)
    );
    assert!(fallback.warnings.iter().any(|w| w.contains("broken")));
}

// ===========================================================================
// Timeline
// ===========================================================================

#[test]
fn test_timeline_capped_at_seven_years() {
    let mut cfg = EngineConfig::default();
    cfg.timeline.high_dependency_years = 5;
    let profile = BusinessProfile {
        revenue: dec!(1000000),
        profit_margin: dec!(3),
        industry: "retail".into(),
        owner_centricity_score: Some(dec!(10)),
        wealth_gap: Some(dec!(2000000)),
        ..Default::default()
    };
    let t = calculate_timeline(&profile, &cfg).unwrap().result;
    // 2 + 5 + 1 + 1
    assert_eq!(t.unadjusted_years, 9);
    assert_eq!(t.recommended_years, 7);
    assert!(t.capped);
    assert_eq!(t.milestones.len(), 7);
    assert_eq!(t.milestones[6].phase, "Exit Execution");
}

// ===========================================================================
// Readiness
// ===========================================================================

#[test]
fn test_readiness_score() {
    let input = ReadinessInput {
        financial: dec!(90),
        business: dec!(85),
        personal: dec!(80),
        market: dec!(90),
    };
    // 27 + 29.75 + 16 + 13.5 = 86.25
    let out = calculate_readiness(&input, &EngineConfig::default()).unwrap();
    assert_eq!(out.result.overall_score, dec!(86));
    assert_eq!(out.result.interpretation.level, ReadinessLevel::Excellent);
    assert!(out.result.improvement_notes.is_empty());
}

#[test]
fn test_readiness_rejects_bad_weights() {
    let mut cfg = EngineConfig::default();
    cfg.readiness.weights.financial = dec!(-1);
    let input = ReadinessInput {
        financial: dec!(50),
        business: dec!(50),
        personal: dec!(50),
        market: dec!(50),
    };
    assert!(matches!(
        calculate_readiness(&input, &cfg),
        Err(ExitPlanError::InvalidConfig { .. })
    ));
}

// ===========================================================================
// Full analysis
// ===========================================================================

#[test]
fn test_full_analysis_example() {
    let request = AnalysisRequest {
        profile: example_profile(),
        personal_readiness: Some(dec!(70)),
    };
    let out = analyze_business(&request, &EngineConfig::default(), &NoopEnhancer).unwrap();
    let a = &out.result;
    assert_eq!(a.valuation.estimated_value, dec!(897750));
    assert_eq!(a.total_investment, dec!(155000));
    assert_eq!(a.timeline.recommended_years, 4);
    assert_eq!(a.readiness.breakdown.personal, dec!(70));
    assert_eq!(
        a.projected_value,
        a.valuation.estimated_value + a.total_value_impact
    );
    assert!(out.metadata.computation_time_us < 10_000_000);
}

#[test]
fn test_analysis_request_from_json() {
    let json = r#"{
        "profile": {
            "revenue": "2500000",
            "profit_margin": "12",
            "industry": "Consulting",
            "owner_centricity_score": "45",
            "top_customer_percentage": "35"
        }
    }"#;
    let request: AnalysisRequest = serde_json::from_str(json).unwrap();
    let out = analyze_business(&request, &EngineConfig::default(), &NoopEnhancer).unwrap();
    assert_eq!(out.result.valuation.estimated_value, dec!(897750));
}

// ===========================================================================
// Optional calculators
// ===========================================================================

#[cfg(feature = "owner_centricity")]
#[test]
fn test_questionnaire_feeds_valuation() {
    use exitplan_core::assessment::owner_centricity::{
        score_owner_centricity, AreaAnswers, FunctionalArea, OwnerCentricityInput,
    };
    use exitplan_core::valuation::calculate_valuation;

    let input = OwnerCentricityInput {
        areas: vec![
            AreaAnswers {
                area: FunctionalArea::SalesAndCustomers,
                answers: vec![4, 4, 3],
            },
            AreaAnswers {
                area: FunctionalArea::Operations,
                answers: vec![3, 3],
            },
            AreaAnswers {
                area: FunctionalArea::FinancialManagement,
                answers: vec![4],
            },
            AreaAnswers {
                area: FunctionalArea::StrategicDecisions,
                answers: vec![2, 3],
            },
            AreaAnswers {
                area: FunctionalArea::Innovation,
                answers: vec![1],
            },
        ],
    };
    let score = score_owner_centricity(&input).unwrap().result.overall_score;
    assert!((Decimal::ZERO..=dec!(100)).contains(&score));

    let mut profile = example_profile();
    profile.owner_centricity_score = Some(score);
    let out = calculate_valuation(&profile, &EngineConfig::default()).unwrap();
    assert!(out.result.valuation.estimated_value > Decimal::ZERO);
}

#[cfg(feature = "value_tracker")]
#[test]
fn test_value_tracker_projection() {
    use exitplan_core::valuation::value_tracker::{track_value, ValueTrackerInput};

    let input = ValueTrackerInput {
        profile: example_profile(),
        selected: vec![
            "process-documentation".into(),
            "financial-controls".into(),
            "no-such-thing".into(),
        ],
    };
    let out = track_value(&input, &EngineConfig::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.baseline_value, dec!(897750));
    assert_eq!(r.total_investment, dec!(75000));
    assert_eq!(r.projected_value, dec!(1277750));
    assert_eq!(r.selected.len(), 2);
    assert_eq!(out.warnings.len(), 1);
}
