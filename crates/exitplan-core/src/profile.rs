//! The business profile supplied by the dashboard forms, and its
//! normalised counterpart consumed by every calculator.
//!
//! Raw profiles are permissive: optional fields may be absent and
//! percentages may be out of range. [`BusinessProfile::normalize`] fills in
//! the documented defaults and clamps values, reporting each adjustment as a
//! warning instead of failing.
//!
//! Owner-centricity convention used throughout the crate: a **higher** score
//! means the business is **less** dependent on its owner. The inverse view
//! is available as [`NormalizedProfile::owner_dependency_level`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::currency::MAX_AMOUNT;
use crate::industry::{resolve_industry, IndustryKey};
use crate::types::{clamp_percent, Money, Percent, Score, Years};

pub const DEFAULT_OWNER_CENTRICITY: Score = dec!(50);
pub const DEFAULT_MANAGEMENT_LEVELS: u32 = 1;
pub const DEFAULT_PROCESS_DOCUMENTATION: Percent = dec!(30);
pub const DEFAULT_TOP_CUSTOMER_PERCENTAGE: Percent = dec!(30);
pub const DEFAULT_TOTAL_CUSTOMERS: u32 = 50;
pub const DEFAULT_AVG_CUSTOMER_TENURE: Years = dec!(3);
pub const DEFAULT_CONTRACTED_REVENUE: Percent = dec!(30);
pub const DEFAULT_REVENUE_GROWTH: Percent = dec!(5);
pub const MAX_CUSTOMER_TENURE: Years = dec!(100);

/// Business data as captured from the assessment forms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Annual revenue
    pub revenue: Money,
    /// Net profit margin, 0-100
    pub profit_margin: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<u32>,
    /// Free-text industry, resolved by keyword
    pub industry: String,
    /// 0-100, higher = less owner-dependent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_centricity_score: Option<Score>,
    /// Share of revenue from the single largest customer, 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_customer_percentage: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub management_levels: Option<u32>,
    /// Share of processes documented, 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_documentation: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_customers: Option<u32>,
    /// Average customer tenure in years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_customer_tenure: Option<Years>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contracted_revenue_percentage: Option<Percent>,
    /// Annual revenue growth, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_growth_rate: Option<Percent>,
    /// Personal wealth gap carried over from the wealth-gap calculator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wealth_gap: Option<Money>,
}

/// A profile with every field resolved and within range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    pub revenue: Money,
    pub profit_margin: Percent,
    pub employees: u32,
    pub industry: String,
    pub industry_key: IndustryKey,
    pub owner_centricity_score: Score,
    pub top_customer_percentage: Percent,
    pub management_levels: u32,
    pub process_documentation: Percent,
    pub total_customers: u32,
    pub avg_customer_tenure: Years,
    pub contracted_revenue_percentage: Percent,
    pub revenue_growth_rate: Percent,
    pub wealth_gap: Money,
}

impl NormalizedProfile {
    /// `revenue × margin`.
    pub fn ebitda(&self) -> Money {
        self.revenue * self.profit_margin / dec!(100)
    }

    /// Display-side inverse of the centricity score (100 = fully owner-run).
    pub fn owner_dependency_level(&self) -> Score {
        dec!(100) - self.owner_centricity_score
    }
}

fn percent_or_default(
    field: &str,
    value: Option<Decimal>,
    default: Decimal,
    warnings: &mut Vec<String>,
) -> Decimal {
    match value {
        Some(v) => clamp_field(field, v, warnings),
        None => {
            tracing::debug!(field, %default, "optional field missing, using default");
            default
        }
    }
}

fn clamp_field(field: &str, value: Decimal, warnings: &mut Vec<String>) -> Decimal {
    let clamped = clamp_percent(value);
    if clamped != value {
        tracing::warn!(field, %value, %clamped, "percentage out of range");
        warnings.push(format!("{field} {value} outside [0, 100]; clamped to {clamped}"));
    }
    clamped
}

/// Floor at zero and cap at [`MAX_AMOUNT`], warning on either.
fn amount_field(field: &str, value: Money, warnings: &mut Vec<String>) -> Money {
    if value < Decimal::ZERO {
        warnings.push(format!("{field} {value} is negative; treated as 0"));
        Decimal::ZERO
    } else if value > MAX_AMOUNT {
        tracing::warn!(field, %value, "amount above supported magnitude");
        warnings.push(format!("{field} {value} above {MAX_AMOUNT}; clamped"));
        MAX_AMOUNT
    } else {
        value
    }
}

impl BusinessProfile {
    /// Resolve defaults, clamp ranges and classify the industry.
    pub fn normalize(&self) -> (NormalizedProfile, Vec<String>) {
        let mut warnings = Vec::new();

        let revenue = amount_field("revenue", self.revenue, &mut warnings);

        let profit_margin = clamp_field("profit_margin", self.profit_margin, &mut warnings);

        let industry_key = resolve_industry(&self.industry);
        if industry_key.is_fallback() {
            tracing::debug!(industry = %self.industry, "no industry keyword matched");
            warnings.push(format!(
                "Industry '{}' not recognised; using general benchmark",
                self.industry
            ));
        }

        let avg_customer_tenure = match self.avg_customer_tenure {
            Some(t) if t < Decimal::ZERO => {
                warnings.push(format!("avg_customer_tenure {t} is negative; treated as 0"));
                Decimal::ZERO
            }
            Some(t) if t > MAX_CUSTOMER_TENURE => {
                warnings.push(format!(
                    "avg_customer_tenure {t} above {MAX_CUSTOMER_TENURE}; clamped"
                ));
                MAX_CUSTOMER_TENURE
            }
            Some(t) => t,
            None => DEFAULT_AVG_CUSTOMER_TENURE,
        };

        let revenue_growth_rate = match self.revenue_growth_rate {
            Some(g) => {
                let bounded = g.max(dec!(-100)).min(dec!(100));
                if bounded != g {
                    warnings.push(format!(
                        "revenue_growth_rate {g} outside [-100, 100]; clamped to {bounded}"
                    ));
                }
                bounded
            }
            None => DEFAULT_REVENUE_GROWTH,
        };

        let normalized = NormalizedProfile {
            revenue,
            profit_margin,
            employees: self.employees.unwrap_or(0),
            industry: self.industry.clone(),
            industry_key,
            owner_centricity_score: percent_or_default(
                "owner_centricity_score",
                self.owner_centricity_score,
                DEFAULT_OWNER_CENTRICITY,
                &mut warnings,
            ),
            top_customer_percentage: percent_or_default(
                "top_customer_percentage",
                self.top_customer_percentage,
                DEFAULT_TOP_CUSTOMER_PERCENTAGE,
                &mut warnings,
            ),
            management_levels: self.management_levels.unwrap_or(DEFAULT_MANAGEMENT_LEVELS),
            process_documentation: percent_or_default(
                "process_documentation",
                self.process_documentation,
                DEFAULT_PROCESS_DOCUMENTATION,
                &mut warnings,
            ),
            total_customers: self.total_customers.unwrap_or(DEFAULT_TOTAL_CUSTOMERS),
            avg_customer_tenure,
            contracted_revenue_percentage: percent_or_default(
                "contracted_revenue_percentage",
                self.contracted_revenue_percentage,
                DEFAULT_CONTRACTED_REVENUE,
                &mut warnings,
            ),
            revenue_growth_rate,
            wealth_gap: match self.wealth_gap {
                Some(gap) => amount_field("wealth_gap", gap, &mut warnings),
                None => Decimal::ZERO,
            },
        };

        (normalized, warnings)
    }
}
