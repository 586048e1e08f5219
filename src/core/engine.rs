use super::amortize::{monthly_payment, remaining_balance};
use super::types::{
    AccountBalance, CashPolicy, ConfigError, ContributionRule, HomeConfig, HouseholdHelocConfig,
    IncomeItem, IncomeSource, PropertyConfig, RetirementAccountConfig, RiskLevel, ScenarioConfig,
    StudentLoanConfig, YearlyRecord,
};

const STRESS_TEST_INFLATION_BUMP: f64 = 0.05;
const FRUGAL_EXPENSE_CUT: f64 = 0.15;
const INCOME_DROP_HAIRCUT: f64 = 0.9;

const ADVICE_TIGHT: &str = "Tight year: review expenses or defer big investments";
const ADVICE_CAUTION: &str = "Consider delaying new purchases or boosting income";
const ADVICE_OPPORTUNITY: &str = "Good cash flow: consider a new rental or extra investment";

#[derive(Debug)]
struct PropertyState {
    /// Loan principal baseline fixed at acquisition; the amortization formula
    /// reads it every year, it never changes.
    principal: f64,
    heloc_balance: f64,
    active: bool,
}

impl PropertyState {
    fn new(config: &PropertyConfig) -> Self {
        Self {
            principal: config.acquisition_principal(),
            heloc_balance: 0.0,
            active: true,
        }
    }
}

#[derive(Debug)]
struct AccountState {
    balance: f64,
    flat_contribution: f64,
}

impl AccountState {
    fn new(config: &RetirementAccountConfig) -> Self {
        Self {
            balance: config.start_balance,
            flat_contribution: match config.contribution {
                ContributionRule::Flat(amount) => amount,
                ContributionRule::PercentOfIncome(_) => 0.0,
            },
        }
    }
}

#[derive(Debug, Default)]
struct PropertyYear {
    cash_flow: f64,
    equity: f64,
    debt_service: f64,
    /// Capital events: down payment out, HELOC draw in, liquidation proceeds in.
    cash_delta: f64,
    owned: bool,
}

#[derive(Debug, Default)]
struct HomeYear {
    mortgage_payment: f64,
    heloc_payment: f64,
    equity: f64,
}

/// Runs the full projection: one [`YearlyRecord`] per year `1..=horizon`.
///
/// The configuration is validated first; no partial sequence is ever
/// produced. Identical configurations always yield identical sequences.
pub fn run_projection(config: &ScenarioConfig) -> Result<Vec<YearlyRecord>, ConfigError> {
    config.validate()?;

    let mut records = Vec::with_capacity(config.horizon_years as usize);
    let mut cash = config.starting_cash;
    let mut properties: Vec<PropertyState> =
        config.properties.iter().map(PropertyState::new).collect();
    let mut accounts: Vec<AccountState> = config.retirement.iter().map(AccountState::new).collect();

    for year in 1..=config.horizon_years {
        let frugal = config.modes.is_frugal(year);

        let mut income_by_source = Vec::with_capacity(config.incomes.len());
        let mut employment_income = 0.0;
        for source in &config.incomes {
            let suspended = frugal && config.modes.cut_secondary && source.secondary;
            let amount = if suspended {
                0.0
            } else {
                income_for_year(source, year)
            };
            employment_income += amount;
            income_by_source.push(IncomeItem {
                name: source.name.clone(),
                amount,
            });
        }
        let mut income_total = employment_income;
        if config.modes.push_hard && year <= config.modes.push_years {
            income_total += config.modes.push_bonus;
        }
        if config.modes.income_drop {
            income_total *= INCOME_DROP_HAIRCUT;
        }

        let expense_total = expenses_for_year(config, year, frugal);

        let (student_loan_payment, student_loan_balance) =
            step_student_loan(config.student_loan.as_ref(), year);

        let home_year = step_home(config.home.as_ref(), year);

        let mut rental_cash_flow = 0.0;
        let mut property_equity = 0.0;
        let mut property_debt_service = 0.0;
        let mut capital_delta = 0.0;
        let mut active_properties = 0;
        for (property, state) in config.properties.iter().zip(properties.iter_mut()) {
            let result = step_property(property, state, year);
            rental_cash_flow += result.cash_flow;
            property_equity += result.equity;
            property_debt_service += result.debt_service;
            capital_delta += result.cash_delta;
            if result.owned {
                active_properties += 1;
            }
        }

        let suspend_retirement = frugal && config.modes.suspend_retirement;
        let mut employee_contributions = 0.0;
        let mut retirement_total = 0.0;
        let mut retirement_by_account = Vec::with_capacity(config.retirement.len());
        for (account, state) in config.retirement.iter().zip(accounts.iter_mut()) {
            let income_for_account = match &account.income_source {
                Some(source) => income_by_source
                    .iter()
                    .find(|item| &item.name == source)
                    .map_or(0.0, |item| item.amount),
                None => employment_income,
            };
            employee_contributions +=
                step_retirement(account, state, income_for_account, suspend_retirement);
            retirement_total += state.balance;
            retirement_by_account.push(AccountBalance {
                name: account.name.clone(),
                balance: state.balance,
            });
        }
        let retirement_outflow = if config.contributions_reduce_cash {
            employee_contributions
        } else {
            0.0
        };

        let net_cash_flow = income_total + rental_cash_flow
            - expense_total
            - (home_year.mortgage_payment + home_year.heloc_payment + student_loan_payment)
            - retirement_outflow;

        cash += match config.cash_policy {
            CashPolicy::SavingsFloor => net_cash_flow.max(0.0),
            CashPolicy::ReinvestSurplus => net_cash_flow,
        };
        cash += capital_delta;

        let net_worth = cash + home_year.equity + property_equity + retirement_total
            - student_loan_balance;

        let risk = if net_cash_flow < 0.0 {
            RiskLevel::Critical
        } else if net_cash_flow < config.caution_threshold {
            RiskLevel::Caution
        } else {
            RiskLevel::Healthy
        };
        let purchased_this_year = config
            .properties
            .iter()
            .any(|p| !p.existing && p.purchase_year == year);
        let mut advice = match risk {
            RiskLevel::Critical => ADVICE_TIGHT,
            RiskLevel::Caution => ADVICE_CAUTION,
            RiskLevel::Healthy => "",
        }
        .to_string();
        if net_cash_flow > config.opportunity_threshold && !purchased_this_year {
            advice = ADVICE_OPPORTUNITY.to_string();
        }

        records.push(YearlyRecord {
            year,
            income_total,
            income_by_source,
            expense_total,
            rental_cash_flow,
            mortgage_payment: home_year.mortgage_payment,
            heloc_payment: home_year.heloc_payment,
            student_loan_payment,
            property_debt_service,
            student_loan_balance,
            retirement_total,
            retirement_by_account,
            retirement_outflow,
            net_cash_flow,
            cash_balance: cash,
            home_equity: home_year.equity,
            property_equity,
            active_properties,
            net_worth,
            risk,
            advice,
        });
    }

    Ok(records)
}

fn income_for_year(source: &IncomeSource, year: u32) -> f64 {
    if year < source.start_year {
        return 0.0;
    }
    source.base_annual * (1.0 + source.growth_rate).powi((year - source.start_year) as i32)
}

fn expenses_for_year(config: &ScenarioConfig, year: u32, frugal: bool) -> f64 {
    let mut inflation = config.expenses.inflation_rate;
    if config.expenses.stress_test {
        inflation += STRESS_TEST_INFLATION_BUMP;
    }
    let mut expenses = config.expenses.base_annual * (1.0 + inflation).powi((year - 1) as i32);
    if frugal && config.modes.cut_discretionary {
        expenses *= 1.0 - FRUGAL_EXPENSE_CUT;
    }
    expenses
}

/// Annual payment and end-of-year balance for the aggregate student loan.
/// Forgiveness forces the balance to zero from the configured year onward;
/// the payment in the forgiveness year itself is already zero.
fn step_student_loan(loan: Option<&StudentLoanConfig>, year: u32) -> (f64, f64) {
    let Some(loan) = loan else {
        return (0.0, 0.0);
    };
    if let Some(forgiveness) = loan.forgiveness_year {
        if year >= forgiveness {
            return (0.0, 0.0);
        }
    }
    if year < loan.start_year {
        return (0.0, loan.balance);
    }
    let months_before = (year - loan.start_year) * 12;
    let balance_before = remaining_balance(loan.balance, loan.rate, loan.term_years, months_before);
    let payment = if balance_before > 0.0 {
        monthly_payment(loan.balance, loan.rate, loan.term_years) * 12.0
    } else {
        0.0
    };
    let balance_after =
        remaining_balance(loan.balance, loan.rate, loan.term_years, months_before + 12);
    (payment, balance_after)
}

fn step_home(home: Option<&HomeConfig>, year: u32) -> HomeYear {
    let Some(home) = home else {
        return HomeYear::default();
    };
    let principal = home.mortgage_principal();

    let (mortgage_payment, mortgage_balance) = if year < home.start_year {
        (0.0, principal)
    } else {
        let months_before = (year - home.start_year) * 12;
        let balance_before =
            remaining_balance(principal, home.rate, home.term_years, months_before);
        let payment = if balance_before > 0.0 {
            monthly_payment(principal, home.rate, home.term_years) * 12.0
        } else {
            0.0
        };
        let balance_after =
            remaining_balance(principal, home.rate, home.term_years, months_before + 12);
        (payment, balance_after)
    };

    let (heloc_payment, heloc_outstanding) = match &home.heloc {
        Some(heloc) => household_heloc(heloc, year),
        None => (0.0, 0.0),
    };

    HomeYear {
        mortgage_payment,
        heloc_payment,
        equity: (home.value - mortgage_balance - heloc_outstanding).max(0.0),
    }
}

/// Household HELOC repays straight-line, `drawn / term` per year, only during
/// `[start_year, start_year + term_years)`.
fn household_heloc(heloc: &HouseholdHelocConfig, year: u32) -> (f64, f64) {
    if heloc.drawn <= 0.0 || heloc.term_years == 0 {
        return (0.0, 0.0);
    }
    let annual = heloc.drawn / heloc.term_years as f64;
    let in_window = year >= heloc.start_year && year < heloc.start_year + heloc.term_years;
    let payment = if in_window { annual } else { 0.0 };
    let years_paid = if year < heloc.start_year {
        0
    } else {
        (year - heloc.start_year + 1).min(heloc.term_years)
    };
    let outstanding = (heloc.drawn - annual * years_paid as f64).max(0.0);
    (payment, outstanding)
}

fn step_property(config: &PropertyConfig, state: &mut PropertyState, year: u32) -> PropertyYear {
    if !state.active || year < config.purchase_year {
        return PropertyYear::default();
    }

    let mut cash_delta = 0.0;
    if year == config.purchase_year && !config.existing {
        cash_delta -= config.value * config.down_payment_pct;
    }

    let years_held = year - config.purchase_year;
    let value = config.value * (1.0 + config.value_growth_rate).powi(years_held as i32);
    let mortgage_balance = remaining_balance(
        state.principal,
        config.mortgage_rate,
        config.mortgage_term_years,
        years_held * 12,
    );

    // One-shot draw, clamped to combined-loan-to-value headroom. An
    // oversized request is a policy conflict, not an error.
    if let Some(heloc) = &config.heloc {
        if year == heloc.draw_year {
            let headroom = (heloc.max_cltv * value - mortgage_balance).max(0.0);
            let draw = heloc.draw_amount.min(headroom);
            state.heloc_balance += draw;
            cash_delta += draw;
        }
    }

    let rent = if year >= config.rent_start_year {
        12.0 * config.monthly_rent
            * (1.0 + config.rent_growth_rate).powi((year - config.rent_start_year) as i32)
    } else {
        0.0
    };
    let fractional_costs = rent
        * (config.management_pct
            + config.maintenance_pct
            + config.vacancy_pct
            + config.capex_pct);
    let fixed_costs = config.fixed_monthly_costs * 12.0;

    let mortgage_service = if mortgage_balance > 0.0 {
        12.0 * monthly_payment(state.principal, config.mortgage_rate, config.mortgage_term_years)
    } else {
        0.0
    };
    let heloc_interest = state.heloc_balance * config.heloc.as_ref().map_or(0.0, |h| h.rate);
    let debt_service = mortgage_service + heloc_interest;

    let cash_flow = rent - (fractional_costs + fixed_costs + debt_service);
    let mut equity = value - mortgage_balance - state.heloc_balance;

    if config.liquidation_year == Some(year) {
        // Sale proceeds replace the booked equity; debt clears with the sale
        // and the proceeds can never go negative.
        cash_delta += equity.max(0.0);
        equity = 0.0;
        state.heloc_balance = 0.0;
        state.active = false;
    }

    PropertyYear {
        cash_flow,
        equity,
        debt_service,
        cash_delta,
        owned: true,
    }
}

/// Contributions land before growth is applied; the employer match is capped
/// both by the explicit ceiling and by what the employee actually put in.
/// Returns the employee outflow (main contribution plus supplemental).
fn step_retirement(
    config: &RetirementAccountConfig,
    state: &mut AccountState,
    income_for_account: f64,
    suspended: bool,
) -> f64 {
    let employee = if suspended {
        0.0
    } else {
        match config.contribution {
            ContributionRule::Flat(_) => state.flat_contribution,
            ContributionRule::PercentOfIncome(pct) => income_for_account * pct,
        }
    };
    let supplemental = if suspended { 0.0 } else { config.supplemental };
    let effective_rate = if income_for_account > 0.0 {
        employee / income_for_account
    } else {
        0.0
    };
    let employer = income_for_account
        * config
            .employer_match_rate
            .min(effective_rate.min(config.match_cap_rate));

    state.balance =
        (state.balance + employee + employer + supplemental) * (1.0 + config.growth_rate);
    state.flat_contribution *= 1.0 + config.contribution_growth_rate;

    employee + supplemental
}
