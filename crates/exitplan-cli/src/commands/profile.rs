use clap::Args;
use rust_decimal::Decimal;

use exitplan_core::BusinessProfile;

/// Business profile flags shared by the profile-driven commands
#[derive(Args)]
pub struct ProfileArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Net profit margin in percent (e.g. 12 for 12%)
    #[arg(long)]
    pub profit_margin: Option<Decimal>,

    /// Industry, free text (e.g. "consulting", "software")
    #[arg(long, default_value = "")]
    pub industry: String,

    /// Number of employees
    #[arg(long)]
    pub employees: Option<u32>,

    /// Owner-centricity score, 0-100 (higher means less owner-dependent)
    #[arg(long)]
    pub owner_centricity: Option<Decimal>,

    /// Share of revenue from the largest customer, in percent
    #[arg(long)]
    pub top_customer: Option<Decimal>,

    /// Layers of management below the owner
    #[arg(long)]
    pub management_levels: Option<u32>,

    /// Share of processes documented, in percent
    #[arg(long)]
    pub process_documentation: Option<Decimal>,

    /// Number of active customers
    #[arg(long)]
    pub total_customers: Option<u32>,

    /// Share of revenue under contract, in percent
    #[arg(long)]
    pub contracted_revenue: Option<Decimal>,

    /// Annual revenue growth, in percent
    #[arg(long, allow_hyphen_values = true)]
    pub revenue_growth: Option<Decimal>,

    /// Personal wealth gap from the wealth-gap calculator
    #[arg(long)]
    pub wealth_gap: Option<Decimal>,
}

impl ProfileArgs {
    /// Build a profile from the individual flags.
    pub fn to_profile(&self) -> Result<BusinessProfile, Box<dyn std::error::Error>> {
        let revenue = self
            .revenue
            .ok_or("--revenue is required (or provide --input)")?;
        let profit_margin = self
            .profit_margin
            .ok_or("--profit-margin is required (or provide --input)")?;

        Ok(BusinessProfile {
            revenue,
            profit_margin,
            employees: self.employees,
            industry: self.industry.clone(),
            owner_centricity_score: self.owner_centricity,
            top_customer_percentage: self.top_customer,
            management_levels: self.management_levels,
            process_documentation: self.process_documentation,
            total_customers: self.total_customers,
            contracted_revenue_percentage: self.contracted_revenue,
            revenue_growth_rate: self.revenue_growth,
            wealth_gap: self.wealth_gap,
            ..Default::default()
        })
    }

    /// Profile from `--input`, piped stdin, or the flags, in that order.
    pub fn resolve(&self) -> Result<BusinessProfile, Box<dyn std::error::Error>> {
        match crate::input::read_structured(self.input.as_deref())? {
            Some(profile) => Ok(profile),
            None => self.to_profile(),
        }
    }
}
