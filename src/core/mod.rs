mod amortize;
mod engine;
mod types;

pub use amortize::{monthly_payment, remaining_balance};
pub use engine::run_projection;
pub use types::{
    AccountBalance, CashPolicy, ConfigError, ContributionRule, ExpenseConfig, HomeConfig,
    HouseholdHelocConfig, IncomeItem, IncomeSource, ModeConfig, PropertyConfig,
    PropertyHelocConfig, RetirementAccountConfig, RiskLevel, ScenarioConfig, StudentLoanConfig,
    YearlyRecord,
};
