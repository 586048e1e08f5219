use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid scenario: {field} {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid property {name}: {reason}")]
    InvalidProperty { name: String, reason: String },

    // Field deliberately not named `source`: thiserror would treat that as
    // the error's cause and demand an Error impl from it.
    #[error("retirement account {account} references unknown income source {income}")]
    UnknownIncomeSource { account: String, income: String },
}

impl ConfigError {
    fn field(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// How surplus or deficit operating cash flow updates the cash balance.
///
/// `SavingsFloor` matches the original planner: loss years leave accumulated
/// savings untouched. `ReinvestSurplus` lets losses draw savings down.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CashPolicy {
    SavingsFloor,
    ReinvestSurplus,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Healthy,
    Caution,
    Critical,
}

#[derive(Debug, Clone)]
pub struct IncomeSource {
    pub name: String,
    pub base_annual: f64,
    /// Annual compounding growth as a fraction (0.03 = 3% raise), anchored at `start_year`.
    pub growth_rate: f64,
    pub start_year: u32,
    /// Secondary streams are the ones frugal mode can suspend.
    pub secondary: bool,
}

#[derive(Debug, Clone)]
pub struct ExpenseConfig {
    pub base_annual: f64,
    pub inflation_rate: f64,
    /// Adds five percentage points of inflation on top of `inflation_rate`.
    pub stress_test: bool,
}

#[derive(Debug, Clone)]
pub struct HouseholdHelocConfig {
    pub drawn: f64,
    pub term_years: u32,
    pub start_year: u32,
}

/// Primary residence. The amortizing principal is `loan_amount` minus any
/// household HELOC carve-out, which repays straight-line on its own schedule.
#[derive(Debug, Clone)]
pub struct HomeConfig {
    pub value: f64,
    pub loan_amount: f64,
    pub rate: f64,
    pub term_years: u32,
    pub start_year: u32,
    pub heloc: Option<HouseholdHelocConfig>,
}

impl HomeConfig {
    pub fn mortgage_principal(&self) -> f64 {
        let carve_out = self.heloc.as_ref().map_or(0.0, |h| h.drawn);
        (self.loan_amount - carve_out).max(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct StudentLoanConfig {
    pub balance: f64,
    pub rate: f64,
    pub term_years: u32,
    pub start_year: u32,
    pub forgiveness_year: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub enum ContributionRule {
    Flat(f64),
    PercentOfIncome(f64),
}

#[derive(Debug, Clone)]
pub struct RetirementAccountConfig {
    pub name: String,
    pub start_balance: f64,
    pub contribution: ContributionRule,
    /// Extra flat contribution on top of the main rule.
    pub supplemental: f64,
    /// Year-over-year growth applied to flat contribution amounts.
    pub contribution_growth_rate: f64,
    pub employer_match_rate: f64,
    pub match_cap_rate: f64,
    pub growth_rate: f64,
    /// Earner whose income drives percent contributions and the match.
    /// `None` uses total household employment income.
    pub income_source: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PropertyHelocConfig {
    pub max_cltv: f64,
    pub draw_year: u32,
    pub draw_amount: f64,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct PropertyConfig {
    pub name: String,
    /// Zero for properties already held at the start of the plan.
    pub purchase_year: u32,
    pub liquidation_year: Option<u32>,
    pub existing: bool,
    /// Purchase price, or current value for an existing property.
    pub value: f64,
    pub down_payment_pct: f64,
    /// Given directly for existing properties; derived from price and down
    /// payment otherwise.
    pub starting_mortgage_balance: Option<f64>,
    pub mortgage_rate: f64,
    pub mortgage_term_years: u32,
    pub monthly_rent: f64,
    pub rent_growth_rate: f64,
    pub rent_start_year: u32,
    pub maintenance_pct: f64,
    pub vacancy_pct: f64,
    pub capex_pct: f64,
    pub management_pct: f64,
    pub fixed_monthly_costs: f64,
    pub value_growth_rate: f64,
    pub heloc: Option<PropertyHelocConfig>,
}

impl PropertyConfig {
    /// Loan principal baseline fixed at acquisition time.
    pub fn acquisition_principal(&self) -> f64 {
        match self.starting_mortgage_balance {
            Some(balance) => balance,
            None => self.value * (1.0 - self.down_payment_pct),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModeConfig {
    pub push_hard: bool,
    pub push_bonus: f64,
    pub push_years: u32,
    pub income_drop: bool,
    pub frugal_years: Vec<u32>,
    pub cut_discretionary: bool,
    pub cut_secondary: bool,
    pub suspend_retirement: bool,
}

impl Default for ModeConfig {
    /// All modes off, but the push-hard bonus and window carry usable
    /// defaults so toggling the flag alone has an effect.
    fn default() -> Self {
        Self {
            push_hard: false,
            push_bonus: 10_000.0,
            push_years: 2,
            income_drop: false,
            frugal_years: Vec::new(),
            cut_discretionary: false,
            cut_secondary: false,
            suspend_retirement: false,
        }
    }
}

impl ModeConfig {
    pub fn is_frugal(&self, year: u32) -> bool {
        self.frugal_years.contains(&year)
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub horizon_years: u32,
    pub starting_cash: f64,
    pub incomes: Vec<IncomeSource>,
    pub expenses: ExpenseConfig,
    pub home: Option<HomeConfig>,
    pub student_loan: Option<StudentLoanConfig>,
    pub retirement: Vec<RetirementAccountConfig>,
    pub properties: Vec<PropertyConfig>,
    pub modes: ModeConfig,
    pub cash_policy: CashPolicy,
    /// Employee retirement contributions reduce net cash flow when set.
    pub contributions_reduce_cash: bool,
    pub caution_threshold: f64,
    pub opportunity_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeItem {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub name: String,
    pub balance: f64,
}

/// One simulated year. Append-only output of the projection loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: u32,
    pub income_total: f64,
    pub income_by_source: Vec<IncomeItem>,
    pub expense_total: f64,
    pub rental_cash_flow: f64,
    pub mortgage_payment: f64,
    pub heloc_payment: f64,
    pub student_loan_payment: f64,
    pub property_debt_service: f64,
    pub student_loan_balance: f64,
    pub retirement_total: f64,
    pub retirement_by_account: Vec<AccountBalance>,
    pub retirement_outflow: f64,
    pub net_cash_flow: f64,
    pub cash_balance: f64,
    pub home_equity: f64,
    pub property_equity: f64,
    pub active_properties: u32,
    pub net_worth: f64,
    pub risk: RiskLevel,
    pub advice: String,
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::field(field, "must be finite and >= 0"));
    }
    Ok(())
}

fn check_rate(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::field(field, "must be a finite rate >= 0"));
    }
    Ok(())
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::field(field, "must be between 0 and 1"));
    }
    Ok(())
}

impl ScenarioConfig {
    /// Rejects malformed configurations before any simulation year runs.
    /// Policy conflicts such as an oversized HELOC draw are not errors; the
    /// engine clamps those.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_years == 0 {
            return Err(ConfigError::field("horizon_years", "must be > 0"));
        }
        if !self.starting_cash.is_finite() {
            return Err(ConfigError::field("starting_cash", "must be finite"));
        }
        if !self.caution_threshold.is_finite() || !self.opportunity_threshold.is_finite() {
            return Err(ConfigError::field(
                "caution_threshold",
                "risk thresholds must be finite",
            ));
        }

        for income in &self.incomes {
            check_amount("incomes.base_annual", income.base_annual)?;
            check_rate("incomes.growth_rate", income.growth_rate)?;
        }

        check_amount("expenses.base_annual", self.expenses.base_annual)?;
        check_rate("expenses.inflation_rate", self.expenses.inflation_rate)?;

        if let Some(home) = &self.home {
            check_amount("home.value", home.value)?;
            check_amount("home.loan_amount", home.loan_amount)?;
            check_rate("home.rate", home.rate)?;
            if home.loan_amount > 0.0 && home.term_years == 0 {
                return Err(ConfigError::field(
                    "home.term_years",
                    "must be > 0 when a loan is outstanding",
                ));
            }
            if let Some(heloc) = &home.heloc {
                check_amount("home.heloc.drawn", heloc.drawn)?;
                if heloc.drawn > 0.0 && heloc.term_years == 0 {
                    return Err(ConfigError::field(
                        "home.heloc.term_years",
                        "must be > 0 when a balance is drawn",
                    ));
                }
                if heloc.drawn > home.loan_amount {
                    return Err(ConfigError::field(
                        "home.heloc.drawn",
                        "cannot exceed home.loan_amount",
                    ));
                }
            }
        }

        if let Some(loan) = &self.student_loan {
            check_amount("student_loan.balance", loan.balance)?;
            check_rate("student_loan.rate", loan.rate)?;
            if loan.balance > 0.0 && loan.term_years == 0 {
                return Err(ConfigError::field(
                    "student_loan.term_years",
                    "must be > 0 when a balance is outstanding",
                ));
            }
        }

        for account in &self.retirement {
            check_amount("retirement.start_balance", account.start_balance)?;
            check_amount("retirement.supplemental", account.supplemental)?;
            check_rate(
                "retirement.contribution_growth_rate",
                account.contribution_growth_rate,
            )?;
            check_rate("retirement.growth_rate", account.growth_rate)?;
            check_fraction("retirement.employer_match_rate", account.employer_match_rate)?;
            check_fraction("retirement.match_cap_rate", account.match_cap_rate)?;
            match account.contribution {
                ContributionRule::Flat(amount) => {
                    check_amount("retirement.contribution", amount)?;
                }
                ContributionRule::PercentOfIncome(pct) => {
                    check_fraction("retirement.contribution", pct)?;
                }
            }
            if let Some(source) = &account.income_source {
                if !self.incomes.iter().any(|i| &i.name == source) {
                    return Err(ConfigError::UnknownIncomeSource {
                        account: account.name.clone(),
                        income: source.clone(),
                    });
                }
            }
        }

        for property in &self.properties {
            self.validate_property(property)?;
        }

        if self.modes.push_hard {
            check_amount("modes.push_bonus", self.modes.push_bonus)?;
        }

        Ok(())
    }

    fn validate_property(&self, property: &PropertyConfig) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidProperty {
            name: property.name.clone(),
            reason: reason.to_string(),
        };

        if !property.value.is_finite() || property.value < 0.0 {
            return Err(invalid("value must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&property.down_payment_pct) {
            return Err(invalid("down_payment_pct must be between 0 and 1"));
        }
        if !property.mortgage_rate.is_finite() || property.mortgage_rate < 0.0 {
            return Err(invalid("mortgage_rate must be a finite rate >= 0"));
        }
        if property.acquisition_principal() > 0.0 && property.mortgage_term_years == 0 {
            return Err(invalid("mortgage_term_years must be > 0 with a loan outstanding"));
        }
        if property.existing && property.purchase_year != 0 {
            return Err(invalid("existing properties must have purchase_year 0"));
        }
        if !property.existing && property.starting_mortgage_balance.is_some() {
            return Err(invalid(
                "starting_mortgage_balance is only valid for existing properties",
            ));
        }
        if let Some(liquidation) = property.liquidation_year {
            if liquidation < property.purchase_year {
                return Err(invalid("liquidation_year must be >= purchase_year"));
            }
        }
        if !property.monthly_rent.is_finite() || property.monthly_rent < 0.0 {
            return Err(invalid("monthly_rent must be finite and >= 0"));
        }
        if !property.rent_growth_rate.is_finite() || property.rent_growth_rate < 0.0 {
            return Err(invalid("rent_growth_rate must be a finite rate >= 0"));
        }
        if !property.value_growth_rate.is_finite() || property.value_growth_rate < 0.0 {
            return Err(invalid("value_growth_rate must be a finite rate >= 0"));
        }
        for (label, fraction) in [
            ("maintenance_pct", property.maintenance_pct),
            ("vacancy_pct", property.vacancy_pct),
            ("capex_pct", property.capex_pct),
            ("management_pct", property.management_pct),
        ] {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(ConfigError::InvalidProperty {
                    name: property.name.clone(),
                    reason: format!("{label} must be between 0 and 1"),
                });
            }
        }
        if !property.fixed_monthly_costs.is_finite() || property.fixed_monthly_costs < 0.0 {
            return Err(invalid("fixed_monthly_costs must be finite and >= 0"));
        }
        if let Some(heloc) = &property.heloc {
            if !(0.0..=1.0).contains(&heloc.max_cltv) {
                return Err(invalid("heloc.max_cltv must be between 0 and 1"));
            }
            if !heloc.draw_amount.is_finite() || heloc.draw_amount < 0.0 {
                return Err(invalid("heloc.draw_amount must be finite and >= 0"));
            }
            if !heloc.rate.is_finite() || heloc.rate < 0.0 {
                return Err(invalid("heloc.rate must be a finite rate >= 0"));
            }
        }
        Ok(())
    }
}
