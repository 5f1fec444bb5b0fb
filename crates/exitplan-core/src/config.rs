//! Tunable thresholds and tables used by every calculator.
//!
//! Nothing in here is derived; these are heuristic constants that were
//! previously scattered through the calculations. [`EngineConfig::default`]
//! reproduces the stock behaviour, and a caller may load an override from
//! JSON or YAML and pass it by reference into any calculation.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::currency::MAX_AMOUNT;
use crate::error::ExitPlanError;
use crate::types::{Money, Multiple, Percent, Rate, Score, ScoreLevel, ScoreStatus, StatusColor};
use crate::ExitPlanResult;

/// Upper bound on any configured multiplier, uplift, rate or weight.
pub const MAX_FACTOR: Decimal = dec!(100);

/// Lowest withdrawal rate a scenario may assume (0.1%).
pub const MIN_WITHDRAWAL_RATE: Rate = dec!(0.001);

// ---------------------------------------------------------------------------
// Tier tables
// ---------------------------------------------------------------------------

/// One row of a threshold table: `bound` is compared against the input,
/// `value` is what the row yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTier {
    pub bound: Decimal,
    pub value: Decimal,
}

/// Ordered tiers plus the value used when no tier matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub tiers: Vec<ThresholdTier>,
    pub otherwise: Decimal,
}

impl TierTable {
    fn new(tiers: &[(Decimal, Decimal)], otherwise: Decimal) -> Self {
        TierTable {
            tiers: tiers
                .iter()
                .map(|(bound, value)| ThresholdTier {
                    bound: *bound,
                    value: *value,
                })
                .collect(),
            otherwise,
        }
    }

    /// First tier whose bound is `<= x`. Tiers must be sorted by
    /// descending bound.
    pub fn at_or_above(&self, x: Decimal) -> Decimal {
        self.tiers
            .iter()
            .find(|t| x >= t.bound)
            .map(|t| t.value)
            .unwrap_or(self.otherwise)
    }

    /// First tier whose bound is `> x`. Tiers must be sorted by ascending
    /// bound.
    pub fn below(&self, x: Decimal) -> Decimal {
        self.tiers
            .iter()
            .find(|t| x < t.bound)
            .map(|t| t.value)
            .unwrap_or(self.otherwise)
    }

    /// Every value the table can produce.
    pub fn values(&self) -> Vec<Decimal> {
        let mut v: Vec<Decimal> = self.tiers.iter().map(|t| t.value).collect();
        v.push(self.otherwise);
        v
    }

    fn validate(&self, field: &str, ascending_bounds: bool) -> ExitPlanResult<()> {
        if self.tiers.is_empty() {
            return Err(ExitPlanError::InvalidConfig {
                field: field.into(),
                reason: "At least one tier is required".into(),
            });
        }
        for pair in self.tiers.windows(2) {
            let ordered = if ascending_bounds {
                pair[0].bound < pair[1].bound
            } else {
                pair[0].bound > pair[1].bound
            };
            if !ordered {
                return Err(ExitPlanError::InvalidConfig {
                    field: field.into(),
                    reason: format!(
                        "Tier bounds must be strictly {}",
                        if ascending_bounds { "ascending" } else { "descending" }
                    ),
                });
            }
        }
        // Values must not increase down the table, otherwise the
        // monotonicity of valuations breaks.
        let values = self.values();
        if values.windows(2).any(|w| w[1] > w[0]) {
            return Err(ExitPlanError::InvalidConfig {
                field: field.into(),
                reason: "Tier values must be non-increasing down the table".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Score cut-offs for the Excellent/Good/Average/Below Average/Poor bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub excellent: Score,
    pub good: Score,
    pub average: Score,
    pub below_average: Score,
}

impl StatusThresholds {
    pub fn classify(&self, score: Score) -> ScoreStatus {
        if score >= self.excellent {
            ScoreStatus {
                level: ScoreLevel::Excellent,
                color: StatusColor::Green,
            }
        } else if score >= self.good {
            ScoreStatus {
                level: ScoreLevel::Good,
                color: StatusColor::Blue,
            }
        } else if score >= self.average {
            ScoreStatus {
                level: ScoreLevel::Average,
                color: StatusColor::Yellow,
            }
        } else if score >= self.below_average {
            ScoreStatus {
                level: ScoreLevel::BelowAverage,
                color: StatusColor::Orange,
            }
        } else {
            ScoreStatus {
                level: ScoreLevel::Poor,
                color: StatusColor::Red,
            }
        }
    }
}

/// Score cut-offs for the cash-flow quality rating labels. Scores below
/// `good` but above zero are "Needs Improvement".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRatingThresholds {
    pub excellent: Score,
    pub good: Score,
}

/// Related sub-score cut-offs for a recommendation's impact; at or above
/// `medium_below` the impact is Low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactThresholds {
    pub high_below: Score,
    pub medium_high_below: Score,
    pub medium_below: Score,
}

/// Customer-portfolio risk classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRiskThresholds {
    pub high_concentration_above: Percent,
    pub high_customers_below: u32,
    pub medium_concentration_above: Percent,
    pub medium_customers_below: u32,
}

/// Metric levels at which an opportunity is rated High difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyThresholds {
    /// Owner centricity below this makes management development High.
    pub management_high_below: Score,
    /// Top-customer share above this makes diversification High.
    pub customer_high_above: Percent,
}

impl Default for DifficultyThresholds {
    fn default() -> Self {
        DifficultyThresholds {
            management_high_below: dec!(40),
            customer_high_above: dec!(40),
        }
    }
}

/// One post-exit withdrawal-rate assumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalScenarioConfig {
    pub name: String,
    pub rate: Rate,
    pub risk_level: String,
}

/// How an opportunity's investment is costed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostBasis {
    /// `cost` is an annual run-rate, prorated over `months`.
    Annual,
    /// `cost` is spent once regardless of duration.
    OneOff,
}

/// Parameters shared by every improvement opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityParams {
    pub cost: Money,
    pub cost_basis: CostBasis,
    pub months: u32,
    /// Target level of the driving metric (score or percentage).
    pub target: Decimal,
    /// Opportunity is surfaced only when ROI (in %) exceeds this.
    pub roi_threshold: Percent,
    /// Guaranteed uplift as a fraction of current value.
    pub base_uplift: Rate,
    /// Uplift per unit (fraction) of improvement in the driving metric.
    pub improvement_uplift: Rate,
}

impl OpportunityParams {
    pub fn investment(&self) -> Money {
        match self.cost_basis {
            CostBasis::Annual => self.cost * Decimal::from(self.months) / dec!(12),
            CostBasis::OneOff => self.cost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityConfig {
    pub management: OpportunityParams,
    pub financial: OpportunityParams,
    pub customer: OpportunityParams,
    pub process: OpportunityParams,
    /// Assumed annual return on added value used for payback periods.
    pub payback_return: Rate,
    #[serde(default)]
    pub difficulty: DifficultyThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub base_years: u32,
    pub cap_years: u32,
    /// Centricity below this adds `high_dependency_years`.
    pub high_dependency_below: Score,
    pub high_dependency_years: u32,
    /// Centricity below this (but not high) adds `moderate_dependency_years`.
    pub moderate_dependency_below: Score,
    pub moderate_dependency_years: u32,
    pub low_margin_below: Percent,
    pub low_margin_years: u32,
    pub wealth_gap_above: Money,
    pub wealth_gap_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessWeights {
    pub financial: Rate,
    pub business: Rate,
    pub personal: Rate,
    pub market: Rate,
}

impl ReadinessWeights {
    pub fn total(&self) -> Rate {
        self.financial + self.business + self.personal + self.market
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    pub weights: ReadinessWeights,
    pub excellent: Score,
    pub good: Score,
    pub developing: Score,
    /// Sub-scores below this get an improvement note.
    pub improvement_below: Score,
    /// Personal readiness used when the caller supplies none.
    pub default_personal: Score,
}

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Sections omitted from a config file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub status: StatusThresholds,
    /// Keyed on owner-centricity score, descending bounds.
    pub owner_multiplier: TierTable,
    /// Keyed on top-customer percentage, ascending bounds.
    pub customer_multiplier: TierTable,
    /// Keyed on the cash-flow adjustment ratio, ascending bounds.
    pub cash_flow_quality: TierTable,
    pub cash_flow_rating: QualityRatingThresholds,
    pub impact: ImpactThresholds,
    pub customer_risk: CustomerRiskThresholds,
    pub withdrawal_scenarios: Vec<WithdrawalScenarioConfig>,
    pub opportunities: OpportunityConfig,
    pub timeline: TimelineConfig,
    pub readiness: ReadinessConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            status: StatusThresholds {
                excellent: dec!(85),
                good: dec!(70),
                average: dec!(55),
                below_average: dec!(40),
            },
            owner_multiplier: TierTable::new(
                &[
                    (dec!(85), dec!(1.2)),
                    (dec!(70), dec!(1.1)),
                    (dec!(55), dec!(1.0)),
                    (dec!(40), dec!(0.9)),
                ],
                dec!(0.8),
            ),
            customer_multiplier: TierTable::new(
                &[
                    (dec!(15), dec!(1.1)),
                    (dec!(25), dec!(1.0)),
                    (dec!(40), dec!(0.95)),
                    (dec!(60), dec!(0.85)),
                ],
                dec!(0.75),
            ),
            cash_flow_quality: TierTable::new(
                &[
                    (dec!(0.1), dec!(95)),
                    (dec!(0.2), dec!(85)),
                    (dec!(0.4), dec!(70)),
                    (dec!(0.6), dec!(55)),
                ],
                dec!(40),
            ),
            cash_flow_rating: QualityRatingThresholds {
                excellent: dec!(85),
                good: dec!(70),
            },
            impact: ImpactThresholds {
                high_below: dec!(40),
                medium_high_below: dec!(55),
                medium_below: dec!(70),
            },
            customer_risk: CustomerRiskThresholds {
                high_concentration_above: dec!(40),
                high_customers_below: 10,
                medium_concentration_above: dec!(25),
                medium_customers_below: 25,
            },
            withdrawal_scenarios: vec![
                WithdrawalScenarioConfig {
                    name: "Conservative (4%)".into(),
                    rate: dec!(0.04),
                    risk_level: "Low Risk".into(),
                },
                WithdrawalScenarioConfig {
                    name: "Balanced (5%)".into(),
                    rate: dec!(0.05),
                    risk_level: "Moderate Risk".into(),
                },
                WithdrawalScenarioConfig {
                    name: "Growth (6%)".into(),
                    rate: dec!(0.06),
                    risk_level: "Higher Risk".into(),
                },
            ],
            opportunities: OpportunityConfig {
                management: OpportunityParams {
                    cost: dec!(150000),
                    cost_basis: CostBasis::Annual,
                    months: 12,
                    target: dec!(85),
                    roi_threshold: dec!(200),
                    base_uplift: dec!(0.15),
                    improvement_uplift: dec!(0.25),
                },
                financial: OpportunityParams {
                    cost: dec!(60000),
                    cost_basis: CostBasis::Annual,
                    months: 9,
                    // Target margin comes from the industry benchmark average.
                    target: Decimal::ZERO,
                    roi_threshold: dec!(150),
                    base_uplift: Decimal::ZERO,
                    improvement_uplift: Decimal::ONE,
                },
                customer: OpportunityParams {
                    cost: dec!(80000),
                    cost_basis: CostBasis::OneOff,
                    months: 18,
                    target: dec!(15),
                    roi_threshold: dec!(100),
                    base_uplift: dec!(0.10),
                    improvement_uplift: dec!(0.20),
                },
                process: OpportunityParams {
                    cost: dec!(60000),
                    cost_basis: CostBasis::Annual,
                    months: 6,
                    target: dec!(80),
                    roi_threshold: dec!(150),
                    base_uplift: Decimal::ZERO,
                    improvement_uplift: dec!(0.20),
                },
                payback_return: dec!(0.05),
                difficulty: DifficultyThresholds::default(),
            },
            timeline: TimelineConfig {
                base_years: 2,
                cap_years: 7,
                high_dependency_below: dec!(60),
                high_dependency_years: 2,
                moderate_dependency_below: dec!(75),
                moderate_dependency_years: 1,
                low_margin_below: dec!(10),
                low_margin_years: 1,
                wealth_gap_above: dec!(500000),
                wealth_gap_years: 1,
            },
            readiness: ReadinessConfig {
                weights: ReadinessWeights {
                    financial: dec!(0.30),
                    business: dec!(0.35),
                    personal: dec!(0.20),
                    market: dec!(0.15),
                },
                excellent: dec!(85),
                good: dec!(70),
                developing: dec!(55),
                improvement_below: dec!(70),
                default_personal: dec!(50),
            },
        }
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ExitPlanError {
    ExitPlanError::InvalidConfig {
        field: field.into(),
        reason: reason.into(),
    }
}

fn within(value: Decimal, low: Decimal, high: Decimal) -> bool {
    value >= low && value <= high
}

impl EngineConfig {
    /// Reject tables that would make calculations meaningless or push
    /// them past the range of a 96-bit decimal.
    pub fn validate(&self) -> ExitPlanResult<()> {
        let s = &self.status;
        if !(s.excellent > s.good && s.good > s.average && s.average > s.below_average) {
            return Err(invalid("status", "Thresholds must be strictly descending"));
        }

        self.owner_multiplier.validate("owner_multiplier", false)?;
        self.customer_multiplier.validate("customer_multiplier", true)?;
        self.cash_flow_quality.validate("cash_flow_quality", true)?;

        if self
            .owner_multiplier
            .values()
            .iter()
            .chain(self.customer_multiplier.values().iter())
            .any(|m: &Multiple| !within(*m, Decimal::ZERO, MAX_FACTOR))
        {
            return Err(invalid(
                "multipliers",
                format!("Multipliers must lie in [0, {MAX_FACTOR}]"),
            ));
        }

        let r = &self.cash_flow_rating;
        if !(r.excellent > r.good && r.good > Decimal::ZERO) {
            return Err(invalid(
                "cash_flow_rating",
                "Thresholds must be strictly descending and positive",
            ));
        }

        let i = &self.impact;
        if !(i.high_below < i.medium_high_below && i.medium_high_below < i.medium_below) {
            return Err(invalid("impact", "Thresholds must be strictly ascending"));
        }

        let c = &self.customer_risk;
        if c.high_concentration_above < c.medium_concentration_above
            || c.high_customers_below > c.medium_customers_below
        {
            return Err(invalid(
                "customer_risk",
                "High-risk thresholds must be at least as strict as medium-risk ones",
            ));
        }

        if self.withdrawal_scenarios.is_empty() {
            return Err(invalid(
                "withdrawal_scenarios",
                "At least one scenario is required",
            ));
        }
        if let Some(bad) = self
            .withdrawal_scenarios
            .iter()
            .find(|w| !within(w.rate, MIN_WITHDRAWAL_RATE, Decimal::ONE))
        {
            return Err(invalid(
                "withdrawal_scenarios",
                format!(
                    "Scenario '{}' must have a rate between {MIN_WITHDRAWAL_RATE} and 1",
                    bad.name
                ),
            ));
        }

        let opps = &self.opportunities;
        for (name, p) in [
            ("management", &opps.management),
            ("financial", &opps.financial),
            ("customer", &opps.customer),
            ("process", &opps.process),
        ] {
            let cost_ok = p.cost.is_zero() || within(p.cost, Decimal::ONE, MAX_AMOUNT);
            if !cost_ok || p.months == 0 {
                return Err(invalid(
                    format!("opportunities.{name}"),
                    format!("Cost must be 0 or in [1, {MAX_AMOUNT}] and months positive"),
                ));
            }
            if !within(p.base_uplift, Decimal::ZERO, MAX_FACTOR)
                || !within(p.improvement_uplift, Decimal::ZERO, MAX_FACTOR)
            {
                return Err(invalid(
                    format!("opportunities.{name}"),
                    format!("Uplifts must lie in [0, {MAX_FACTOR}]"),
                ));
            }
        }
        if !within(opps.payback_return, Decimal::ZERO, MAX_FACTOR) {
            return Err(invalid(
                "opportunities.payback_return",
                format!("Payback return must lie in [0, {MAX_FACTOR}]"),
            ));
        }

        if self.timeline.cap_years < self.timeline.base_years {
            return Err(invalid(
                "timeline.cap_years",
                "Cap must be at least the base timeline",
            ));
        }

        let rd = &self.readiness;
        if !(rd.excellent > rd.good && rd.good > rd.developing) {
            return Err(invalid(
                "readiness",
                "Bands must be strictly descending (excellent > good > developing)",
            ));
        }

        let w = &rd.weights;
        if [w.financial, w.business, w.personal, w.market]
            .iter()
            .any(|v| !within(*v, Decimal::ZERO, MAX_FACTOR))
        {
            return Err(invalid(
                "readiness.weights",
                format!("Weights must lie in [0, {MAX_FACTOR}]"),
            ));
        }
        if w.total() <= Decimal::ZERO {
            return Err(invalid(
                "readiness.weights",
                "Sum of weights must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: EngineConfig = serde_json::from_str(
            r#"{"timeline": {"base_years": 3, "cap_years": 8,
                "high_dependency_below": "60", "high_dependency_years": 2,
                "moderate_dependency_below": "75", "moderate_dependency_years": 1,
                "low_margin_below": "10", "low_margin_years": 1,
                "wealth_gap_above": "500000", "wealth_gap_years": 1}}"#,
        )
        .unwrap();
        assert_eq!(cfg.timeline.base_years, 3);
        assert_eq!(cfg.readiness, EngineConfig::default().readiness);
        cfg.validate().unwrap();
    }

    #[test]
    fn test_default_config_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_status_classification_thresholds() {
        let s = EngineConfig::default().status;
        assert_eq!(s.classify(dec!(85)).level, ScoreLevel::Excellent);
        assert_eq!(s.classify(dec!(84)).level, ScoreLevel::Good);
        assert_eq!(s.classify(dec!(70)).color, StatusColor::Blue);
        assert_eq!(s.classify(dec!(55)).level, ScoreLevel::Average);
        assert_eq!(s.classify(dec!(40)).level, ScoreLevel::BelowAverage);
        assert_eq!(s.classify(dec!(39.9)).color, StatusColor::Red);
    }

    #[test]
    fn test_tier_lookup_directions() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.owner_multiplier.at_or_above(dec!(45)), dec!(0.9));
        assert_eq!(cfg.owner_multiplier.at_or_above(dec!(10)), dec!(0.8));
        assert_eq!(cfg.customer_multiplier.below(dec!(35)), dec!(0.95));
        assert_eq!(cfg.customer_multiplier.below(dec!(60)), dec!(0.75));
    }

    #[test]
    fn test_zero_withdrawal_rate_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.withdrawal_scenarios[1].rate = Decimal::ZERO;
        assert!(matches!(
            cfg.validate(),
            Err(ExitPlanError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_increasing_multiplier_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.owner_multiplier.tiers[2].value = dec!(1.5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_zero_readiness_weights_rejected() {
        let mut cfg = EngineConfig::default();
        cfg.readiness.weights = ReadinessWeights {
            financial: Decimal::ZERO,
            business: Decimal::ZERO,
            personal: Decimal::ZERO,
            market: Decimal::ZERO,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_readiness_bands_must_descend() {
        let mut cfg = EngineConfig::default();
        cfg.readiness.good = dec!(90);
        match cfg.validate() {
            Err(ExitPlanError::InvalidConfig { field, .. }) => assert_eq!(field, "readiness"),
            other => panic!("expected readiness error, got {other:?}"),
        }

        let mut cfg = EngineConfig::default();
        cfg.readiness.developing = dec!(70);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_label_thresholds_must_be_ordered() {
        let mut cfg = EngineConfig::default();
        cfg.cash_flow_rating.good = dec!(90);
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.impact.medium_high_below = dec!(30);
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.customer_risk.high_customers_below = 50;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_magnitudes_are_bounded() {
        let mut cfg = EngineConfig::default();
        cfg.withdrawal_scenarios[0].rate = dec!(0.0000001);
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.owner_multiplier.tiers[0].value = Decimal::MAX;
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.opportunities.process.cost = dec!(0.000001);
        assert!(cfg.validate().is_err());

        let mut cfg = EngineConfig::default();
        cfg.readiness.weights.market = Decimal::MAX;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_difficulty_section_optional_in_files() {
        let mut value = serde_json::to_value(EngineConfig::default()).unwrap();
        value["opportunities"]
            .as_object_mut()
            .unwrap()
            .remove("difficulty");
        let cfg: EngineConfig = serde_json::from_value(value).unwrap();
        assert_eq!(cfg.opportunities.difficulty, DifficultyThresholds::default());
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }

    #[test]
    fn test_management_investment_prorated() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.opportunities.management.investment(), dec!(150000));
        assert_eq!(cfg.opportunities.financial.investment(), dec!(45000));
        assert_eq!(cfg.opportunities.customer.investment(), dec!(80000));
        assert_eq!(cfg.opportunities.process.investment(), dec!(30000));
    }
}
