//! Static industry benchmark table and industry-name resolution.
//!
//! Resolution is deliberately forgiving: free-text industry names are matched
//! case-insensitively against a keyword list, checked in this order:
//!
//! | keywords                                   | key                     |
//! |--------------------------------------------|-------------------------|
//! | `professional`, `consulting`, `accounting` | `professional-services` |
//! | `manufacturing`, `production`              | `manufacturing`         |
//! | `retail`, `store`                          | `retail`                |
//! | `technology`, `software`                   | `technology`            |
//!
//! Anything else resolves to [`IndustryKey::General`], whose benchmark uses
//! the professional-services multiples and margins. The fallback never
//! errors; callers that care can check [`IndustryKey::is_fallback`].

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Multiple, Percent, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndustryKey {
    ProfessionalServices,
    Manufacturing,
    Retail,
    Technology,
    General,
}

impl IndustryKey {
    pub fn is_fallback(&self) -> bool {
        matches!(self, IndustryKey::General)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndustryKey::ProfessionalServices => "professional-services",
            IndustryKey::Manufacturing => "manufacturing",
            IndustryKey::Retail => "retail",
            IndustryKey::Technology => "technology",
            IndustryKey::General => "general",
        }
    }
}

impl std::fmt::Display for IndustryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultipleRange {
    pub low: Multiple,
    pub average: Multiple,
    pub high: Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarginRange {
    pub low: Percent,
    pub average: Percent,
    pub high: Percent,
}

/// Reference figures for one industry category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryBenchmark {
    pub key: IndustryKey,
    pub multiples: MultipleRange,
    pub profit_margin: MarginRange,
    pub owner_centricity_target: Score,
    /// Maximum healthy share of revenue from the top customer.
    pub customer_concentration_limit: Percent,
    pub management_depth_target: u32,
    pub key_success_factors: &'static [&'static str],
    pub common_challenges: &'static [&'static str],
}

const PROFESSIONAL_SERVICES: IndustryBenchmark = IndustryBenchmark {
    key: IndustryKey::ProfessionalServices,
    multiples: MultipleRange {
        low: dec!(2.5),
        average: dec!(3.5),
        high: dec!(4.5),
    },
    profit_margin: MarginRange {
        low: dec!(8),
        average: dec!(15),
        high: dec!(25),
    },
    owner_centricity_target: dec!(75),
    customer_concentration_limit: dec!(20),
    management_depth_target: 3,
    key_success_factors: &[
        "Client relationship diversification",
        "Recurring revenue development",
        "Process documentation",
        "Management team depth",
    ],
    common_challenges: &[
        "High owner dependency",
        "Client concentration risk",
        "Limited scalability",
        "Succession planning gaps",
    ],
};

const MANUFACTURING: IndustryBenchmark = IndustryBenchmark {
    key: IndustryKey::Manufacturing,
    multiples: MultipleRange {
        low: dec!(3.0),
        average: dec!(4.5),
        high: dec!(6.5),
    },
    profit_margin: MarginRange {
        low: dec!(6),
        average: dec!(12),
        high: dec!(20),
    },
    owner_centricity_target: dec!(80),
    customer_concentration_limit: dec!(25),
    management_depth_target: 3,
    key_success_factors: &[
        "Operational efficiency",
        "Quality management systems",
        "Supply chain optimization",
        "Technology integration",
    ],
    common_challenges: &[
        "Key-customer dependency",
        "Aging equipment and capex backlog",
        "Skilled labor retention",
    ],
};

const RETAIL: IndustryBenchmark = IndustryBenchmark {
    key: IndustryKey::Retail,
    multiples: MultipleRange {
        low: dec!(1.5),
        average: dec!(2.5),
        high: dec!(4.0),
    },
    profit_margin: MarginRange {
        low: dec!(3),
        average: dec!(8),
        high: dec!(15),
    },
    owner_centricity_target: dec!(70),
    customer_concentration_limit: dec!(10),
    management_depth_target: 2,
    key_success_factors: &[
        "Brand strength",
        "Location advantages",
        "Inventory management",
        "Customer loyalty programs",
    ],
    common_challenges: &[
        "Thin margins",
        "Lease and location risk",
        "Inventory carrying costs",
    ],
};

const TECHNOLOGY: IndustryBenchmark = IndustryBenchmark {
    key: IndustryKey::Technology,
    multiples: MultipleRange {
        low: dec!(3.0),
        average: dec!(5.0),
        high: dec!(8.0),
    },
    profit_margin: MarginRange {
        low: dec!(10),
        average: dec!(20),
        high: dec!(40),
    },
    owner_centricity_target: dec!(80),
    customer_concentration_limit: dec!(20),
    management_depth_target: 3,
    key_success_factors: &[
        "Intellectual property protection",
        "Recurring revenue models",
        "Scalable technology platform",
        "Technical team retention",
    ],
    common_challenges: &[
        "Founder-held technical knowledge",
        "Key-developer retention",
        "Platform obsolescence",
    ],
};

const GENERAL: IndustryBenchmark = IndustryBenchmark {
    key: IndustryKey::General,
    multiples: PROFESSIONAL_SERVICES.multiples,
    profit_margin: PROFESSIONAL_SERVICES.profit_margin,
    owner_centricity_target: PROFESSIONAL_SERVICES.owner_centricity_target,
    customer_concentration_limit: PROFESSIONAL_SERVICES.customer_concentration_limit,
    management_depth_target: 3,
    key_success_factors: &[
        "Management team depth",
        "Customer diversification",
        "Documented processes",
        "Clean, predictable financials",
    ],
    common_challenges: &[
        "High owner dependency",
        "Customer concentration risk",
    ],
};

const KEYWORDS: &[(&[&str], IndustryKey)] = &[
    (
        &["professional", "consulting", "accounting"],
        IndustryKey::ProfessionalServices,
    ),
    (&["manufacturing", "production"], IndustryKey::Manufacturing),
    (&["retail", "store"], IndustryKey::Retail),
    (&["technology", "software"], IndustryKey::Technology),
];

/// Map a free-text industry name onto a benchmark key.
pub fn resolve_industry(raw: &str) -> IndustryKey {
    let lowered = raw.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| lowered.contains(*w)))
        .map(|(_, key)| *key)
        .unwrap_or(IndustryKey::General)
}

/// The immutable benchmark row for a key.
pub fn benchmark_for(key: IndustryKey) -> &'static IndustryBenchmark {
    match key {
        IndustryKey::ProfessionalServices => &PROFESSIONAL_SERVICES,
        IndustryKey::Manufacturing => &MANUFACTURING,
        IndustryKey::Retail => &RETAIL,
        IndustryKey::Technology => &TECHNOLOGY,
        IndustryKey::General => &GENERAL,
    }
}
