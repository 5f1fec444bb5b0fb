use exitplan_core::analysis::{analyze_business, AnalysisRequest};
use exitplan_core::currency::MAX_AMOUNT;
use exitplan_core::industry::{benchmark_for, resolve_industry, IndustryKey};
use exitplan_core::recommendations::NoopEnhancer;
use exitplan_core::valuation::{calculate_valuation, estimate_value, estimate_value_range};
use exitplan_core::{BusinessProfile, EngineConfig};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn profile(centricity: Decimal, top_customer: Decimal) -> BusinessProfile {
    BusinessProfile {
        revenue: dec!(2500000),
        profit_margin: dec!(12),
        industry: "professional-services".into(),
        owner_centricity_score: Some(centricity),
        top_customer_percentage: Some(top_customer),
        ..Default::default()
    }
}

// ===========================================================================
// Industry resolution
// ===========================================================================

#[test]
fn test_industry_keywords() {
    assert_eq!(
        resolve_industry("Professional Services"),
        IndustryKey::ProfessionalServices
    );
    assert_eq!(
        resolve_industry("accounting firm"),
        IndustryKey::ProfessionalServices
    );
    assert_eq!(
        resolve_industry("widget manufacturing co"),
        IndustryKey::Manufacturing
    );
    assert_eq!(resolve_industry("Corner STORE"), IndustryKey::Retail);
    assert_eq!(resolve_industry("SaaS software"), IndustryKey::Technology);
    assert_eq!(resolve_industry("bakery"), IndustryKey::General);
    assert_eq!(resolve_industry(""), IndustryKey::General);
}

#[test]
fn test_fallback_uses_professional_services_figures() {
    let general = benchmark_for(IndustryKey::General);
    let ps = benchmark_for(IndustryKey::ProfessionalServices);
    assert_eq!(general.multiples.average, ps.multiples.average);
    assert_eq!(general.profit_margin.average, ps.profit_margin.average);
}

// ===========================================================================
// Valuation
// ===========================================================================

#[test]
fn test_worked_example_value() {
    let out = calculate_valuation(&profile(dec!(45), dec!(35)), &EngineConfig::default()).unwrap();
    let v = &out.result.valuation;
    assert_eq!(v.ebitda, dec!(300000));
    assert_eq!(v.owner_multiplier, dec!(0.9));
    assert_eq!(v.customer_multiplier, dec!(0.95));
    assert_eq!(v.estimated_value, dec!(897750));
    assert!(out.warnings.is_empty());
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_value_monotone_in_owner_centricity() {
    let cfg = EngineConfig::default();
    let mut previous = Decimal::ZERO;
    for step in 0..=20u32 {
        let score = Decimal::from(step * 5);
        let (p, _) = profile(score, dec!(35)).normalize();
        let value = estimate_value(&p, &cfg);
        assert!(
            value >= previous,
            "value fell from {previous} to {value} at centricity {score}"
        );
        previous = value;
    }
}

#[test]
fn test_value_never_rises_with_concentration() {
    let cfg = EngineConfig::default();
    let mut previous: Option<Decimal> = None;
    for step in 0..=20u32 {
        let top = Decimal::from(step * 5);
        let (p, _) = profile(dec!(60), top).normalize();
        let value = estimate_value(&p, &cfg);
        if let Some(prev) = previous {
            assert!(value <= prev, "value rose to {value} at concentration {top}");
        }
        previous = Some(value);
    }
}

#[test]
fn test_value_total_and_non_negative() {
    let cfg = EngineConfig::default();
    for industry in ["retail", "software", "manufacturing", "consulting", "farm"] {
        for margin in [dec!(0), dec!(0.5), dec!(12), dec!(100)] {
            for revenue in [dec!(0), dec!(1), dec!(2500000), dec!(1000000000)] {
                let p = BusinessProfile {
                    revenue,
                    profit_margin: margin,
                    industry: industry.into(),
                    ..Default::default()
                };
                let out = calculate_valuation(&p, &cfg).unwrap();
                let v = out.result.valuation.estimated_value;
                assert!(v >= Decimal::ZERO);
                assert_eq!(v, out.result.range.mid);
                assert!(out.result.range.low <= v && v <= out.result.range.high);
            }
        }
    }
}

#[test]
fn test_missing_concentration_uses_default_tier() {
    let p = BusinessProfile {
        revenue: dec!(1000000),
        profit_margin: dec!(10),
        industry: "technology".into(),
        ..Default::default()
    };
    let out = calculate_valuation(&p, &EngineConfig::default()).unwrap();
    // defaults: centricity 50 -> 0.9, top customer 30 -> 0.95
    assert_eq!(out.result.valuation.owner_multiplier, dec!(0.9));
    assert_eq!(out.result.valuation.customer_multiplier, dec!(0.95));
    // 100000 * 5.0 * 0.855
    assert_eq!(out.result.valuation.estimated_value, dec!(427500));
}

#[test]
fn test_value_range_uses_benchmark_multiples() {
    let (p, _) = profile(dec!(45), dec!(35)).normalize();
    let range = estimate_value_range(&p, &EngineConfig::default());
    // 300000 * 4.5 * 0.855
    assert_eq!(range.high, dec!(1154250));
}

// ===========================================================================
// Extreme inputs
// ===========================================================================

#[test]
fn test_extreme_revenue_is_clamped_not_overflowed() {
    let cfg = EngineConfig::default();
    for industry in ["software", "manufacturing", "retail", "bakery"] {
        let input = BusinessProfile {
            revenue: Decimal::MAX,
            profit_margin: dec!(50),
            industry: industry.into(),
            owner_centricity_score: Some(dec!(100)),
            top_customer_percentage: Some(Decimal::ZERO),
            avg_customer_tenure: Some(Decimal::MAX),
            wealth_gap: Some(Decimal::MAX),
            ..Default::default()
        };
        let out = calculate_valuation(&input, &cfg).unwrap();
        assert!(out.result.valuation.estimated_value > Decimal::ZERO);
        assert!(out.result.range.high >= out.result.range.mid);
        assert!(out.warnings.iter().any(|w| w.contains("revenue")));

        let mut capped = input.clone();
        capped.revenue = MAX_AMOUNT;
        let (p, _) = capped.normalize();
        assert_eq!(out.result.valuation.estimated_value, estimate_value(&p, &cfg));

        let request = AnalysisRequest {
            profile: input,
            personal_readiness: Some(Decimal::MAX),
        };
        let analysis = analyze_business(&request, &cfg, &NoopEnhancer).unwrap();
        assert!(analysis.result.projected_value >= analysis.result.valuation.estimated_value);
    }
}
