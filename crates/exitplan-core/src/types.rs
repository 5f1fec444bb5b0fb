use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages expressed on a 0-100 scale (12 = 12%).
pub type Percent = Decimal;

/// Rates expressed as decimals (0.04 = 4%). Used for withdrawal rates.
pub type Rate = Decimal;

/// Multiples (e.g., 3.5x EBITDA)
pub type Multiple = Decimal;

/// Assessment scores on a 0-100 scale.
pub type Score = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Qualitative band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreLevel {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
}

impl std::fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Average => write!(f, "Average"),
            Self::BelowAverage => write!(f, "Below Average"),
            Self::Poor => write!(f, "Poor"),
        }
    }
}

/// Display colour paired with a [`ScoreLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Blue,
    Yellow,
    Orange,
    Red,
}

/// `{level, color}` classification attached to every sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreStatus {
    pub level: ScoreLevel,
    pub color: StatusColor,
}

/// A scored item with its status classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScore {
    pub score: Score,
    pub status: ScoreStatus,
}

/// Expected effect of an action on business value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::MediumHigh => write!(f, "Medium-High"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Implementation difficulty of an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl Difficulty {
    /// Discount applied to ROI when ranking opportunities.
    pub fn ranking_factor(&self) -> Decimal {
        match self {
            Difficulty::Low => Decimal::ONE,
            Difficulty::Medium => dec!(0.8),
            Difficulty::High => dec!(0.6),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round to a whole number, halves away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamp into [0, 100].
pub fn clamp_percent(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(dec!(100))
}

/// Arithmetic mean, zero for an empty slice.
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_whole_midpoint_goes_up() {
        assert_eq!(round_whole(dec!(149.5)), dec!(150));
        assert_eq!(round_whole(dec!(150.5)), dec!(151));
        assert_eq!(round_whole(dec!(37.49)), dec!(37));
    }

    #[test]
    fn test_clamp_percent_bounds() {
        assert_eq!(clamp_percent(dec!(-5)), Decimal::ZERO);
        assert_eq!(clamp_percent(dec!(140)), dec!(100));
        assert_eq!(clamp_percent(dec!(42.5)), dec!(42.5));
    }

    #[test]
    fn test_mean_empty_is_zero() {
        assert_eq!(mean(&[]), Decimal::ZERO);
        assert_eq!(mean(&[dec!(60), dec!(80)]), dec!(70));
    }
}
