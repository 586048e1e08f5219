//! JSON API over the projection engine. Payload fields are optional and
//! layer over a default household scenario; rates and percentages arrive in
//! percent (3 = 3%) and convert to fractions at this boundary.

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CashPolicy, ContributionRule, ExpenseConfig, HomeConfig, HouseholdHelocConfig, IncomeSource,
    ModeConfig, PropertyConfig, PropertyHelocConfig, RetirementAccountConfig, ScenarioConfig,
    StudentLoanConfig, YearlyRecord, run_projection,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCashPolicy {
    #[serde(alias = "savingsFloor", alias = "savings_floor")]
    SavingsFloor,
    #[serde(alias = "reinvestSurplus", alias = "reinvest_surplus")]
    ReinvestSurplus,
}

impl From<ApiCashPolicy> for CashPolicy {
    fn from(value: ApiCashPolicy) -> Self {
        match value {
            ApiCashPolicy::SavingsFloor => CashPolicy::SavingsFloor,
            ApiCashPolicy::ReinvestSurplus => CashPolicy::ReinvestSurplus,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct IncomePayload {
    name: Option<String>,
    base_annual: Option<f64>,
    growth_rate: Option<f64>,
    start_year: Option<u32>,
    secondary: Option<bool>,
}

impl IncomePayload {
    fn build(self) -> IncomeSource {
        IncomeSource {
            name: self.name.unwrap_or_else(|| "income".to_string()),
            base_annual: self.base_annual.unwrap_or(0.0),
            growth_rate: self.growth_rate.unwrap_or(0.0) / 100.0,
            start_year: self.start_year.unwrap_or(1),
            secondary: self.secondary.unwrap_or(false),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExpensePayload {
    base_annual: Option<f64>,
    inflation_rate: Option<f64>,
    stress_test: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct HomePayload {
    value: Option<f64>,
    loan_amount: Option<f64>,
    rate: Option<f64>,
    term_years: Option<u32>,
    start_year: Option<u32>,
    heloc_drawn: Option<f64>,
    heloc_term_years: Option<u32>,
    heloc_start_year: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StudentLoanPayload {
    balance: Option<f64>,
    rate: Option<f64>,
    term_years: Option<u32>,
    start_year: Option<u32>,
    forgiveness_year: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RetirementPayload {
    name: Option<String>,
    start_balance: Option<f64>,
    /// Flat annual contribution; ignored when `contribution_pct_of_income` is set.
    contribution: Option<f64>,
    contribution_pct_of_income: Option<f64>,
    supplemental: Option<f64>,
    contribution_growth: Option<f64>,
    employer_match: Option<f64>,
    match_cap: Option<f64>,
    growth_rate: Option<f64>,
    income_source: Option<String>,
}

impl RetirementPayload {
    fn build(self) -> RetirementAccountConfig {
        let contribution = match self.contribution_pct_of_income {
            Some(pct) => ContributionRule::PercentOfIncome(pct / 100.0),
            None => ContributionRule::Flat(self.contribution.unwrap_or(0.0)),
        };
        RetirementAccountConfig {
            name: self.name.unwrap_or_else(|| "retirement".to_string()),
            start_balance: self.start_balance.unwrap_or(0.0),
            contribution,
            supplemental: self.supplemental.unwrap_or(0.0),
            contribution_growth_rate: self.contribution_growth.unwrap_or(0.0) / 100.0,
            employer_match_rate: self.employer_match.unwrap_or(0.0) / 100.0,
            match_cap_rate: self.match_cap.unwrap_or(0.0) / 100.0,
            growth_rate: self.growth_rate.unwrap_or(0.0) / 100.0,
            income_source: self.income_source,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PropertyPayload {
    name: Option<String>,
    purchase_year: Option<u32>,
    liquidation_year: Option<u32>,
    existing: Option<bool>,
    value: Option<f64>,
    down_payment_pct: Option<f64>,
    starting_mortgage_balance: Option<f64>,
    mortgage_rate: Option<f64>,
    mortgage_term_years: Option<u32>,
    monthly_rent: Option<f64>,
    rent_growth: Option<f64>,
    rent_start_year: Option<u32>,
    maintenance_pct: Option<f64>,
    vacancy_pct: Option<f64>,
    capex_pct: Option<f64>,
    management_pct: Option<f64>,
    fixed_monthly_costs: Option<f64>,
    value_growth: Option<f64>,
    heloc_max_cltv: Option<f64>,
    heloc_draw_year: Option<u32>,
    heloc_draw_amount: Option<f64>,
    heloc_rate: Option<f64>,
}

impl PropertyPayload {
    fn build(self) -> PropertyConfig {
        let existing = self.existing.unwrap_or(false);
        let purchase_year = self
            .purchase_year
            .unwrap_or(if existing { 0 } else { 1 });
        let heloc = self.heloc_draw_year.map(|draw_year| PropertyHelocConfig {
            max_cltv: self.heloc_max_cltv.unwrap_or(80.0) / 100.0,
            draw_year,
            draw_amount: self.heloc_draw_amount.unwrap_or(0.0),
            rate: self.heloc_rate.unwrap_or(0.0) / 100.0,
        });
        PropertyConfig {
            name: self.name.unwrap_or_else(|| "rental".to_string()),
            purchase_year,
            liquidation_year: self.liquidation_year,
            existing,
            value: self.value.unwrap_or(0.0),
            down_payment_pct: self.down_payment_pct.unwrap_or(20.0) / 100.0,
            starting_mortgage_balance: self.starting_mortgage_balance,
            mortgage_rate: self.mortgage_rate.unwrap_or(0.0) / 100.0,
            mortgage_term_years: self.mortgage_term_years.unwrap_or(30),
            monthly_rent: self.monthly_rent.unwrap_or(0.0),
            rent_growth_rate: self.rent_growth.unwrap_or(0.0) / 100.0,
            rent_start_year: self.rent_start_year.unwrap_or(purchase_year.max(1)),
            maintenance_pct: self.maintenance_pct.unwrap_or(0.0) / 100.0,
            vacancy_pct: self.vacancy_pct.unwrap_or(0.0) / 100.0,
            capex_pct: self.capex_pct.unwrap_or(0.0) / 100.0,
            management_pct: self.management_pct.unwrap_or(0.0) / 100.0,
            fixed_monthly_costs: self.fixed_monthly_costs.unwrap_or(0.0),
            value_growth_rate: self.value_growth.unwrap_or(0.0) / 100.0,
            heloc,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    horizon_years: Option<u32>,
    starting_cash: Option<f64>,
    incomes: Option<Vec<IncomePayload>>,
    expenses: Option<ExpensePayload>,
    include_home: Option<bool>,
    home: Option<HomePayload>,
    include_student_loan: Option<bool>,
    student_loan: Option<StudentLoanPayload>,
    retirement: Option<Vec<RetirementPayload>>,
    properties: Option<Vec<PropertyPayload>>,

    push_hard: Option<bool>,
    push_bonus: Option<f64>,
    push_years: Option<u32>,
    income_drop: Option<bool>,
    frugal_years: Option<Vec<u32>>,
    cut_discretionary: Option<bool>,
    cut_secondary: Option<bool>,
    suspend_retirement: Option<bool>,

    cash_policy: Option<ApiCashPolicy>,
    contributions_reduce_cash: Option<bool>,
    caution_threshold: Option<f64>,
    opportunity_threshold: Option<f64>,
}

/// Yearly records plus an echo of the resolved scenario's headline figures,
/// so callers can see what their partial payload actually projected.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    horizon_years: u32,
    starting_cash: f64,
    cash_policy: &'static str,
    income_sources: Vec<String>,
    property_names: Vec<String>,
    years: Vec<YearlyRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// The scenario served when a request supplies nothing: a two-earner
/// household with a side income, a mortgaged primary home, a student loan,
/// one retirement account and one leveraged rental.
fn default_config() -> ScenarioConfig {
    ScenarioConfig {
        horizon_years: 20,
        starting_cash: 0.0,
        incomes: vec![
            IncomeSource {
                name: "primary".to_string(),
                base_annual: 90_000.0,
                growth_rate: 0.03,
                start_year: 1,
                secondary: false,
            },
            IncomeSource {
                name: "partner".to_string(),
                base_annual: 75_000.0,
                growth_rate: 0.03,
                start_year: 1,
                secondary: false,
            },
            IncomeSource {
                name: "side-income".to_string(),
                base_annual: 5_000.0,
                growth_rate: 0.0,
                start_year: 1,
                secondary: true,
            },
        ],
        expenses: ExpenseConfig {
            base_annual: 75_000.0,
            inflation_rate: 0.03,
            stress_test: false,
        },
        home: Some(HomeConfig {
            value: 789_560.0,
            loan_amount: 510_000.0,
            rate: 0.065,
            term_years: 30,
            start_year: 1,
            heloc: None,
        }),
        student_loan: Some(StudentLoanConfig {
            balance: 160_000.0,
            rate: 0.068,
            term_years: 20,
            start_year: 1,
            forgiveness_year: None,
        }),
        retirement: vec![RetirementAccountConfig {
            name: "household-401k".to_string(),
            start_balance: 80_000.0,
            contribution: ContributionRule::Flat(12_000.0),
            supplemental: 0.0,
            contribution_growth_rate: 0.0,
            employer_match_rate: 0.0,
            match_cap_rate: 0.0,
            growth_rate: 0.07,
            income_source: None,
        }],
        properties: vec![PropertyConfig {
            name: "rental-1".to_string(),
            purchase_year: 1,
            liquidation_year: None,
            existing: false,
            value: 300_000.0,
            down_payment_pct: 0.20,
            starting_mortgage_balance: None,
            mortgage_rate: 0.065,
            mortgage_term_years: 30,
            monthly_rent: 2_200.0,
            rent_growth_rate: 0.03,
            rent_start_year: 1,
            maintenance_pct: 0.05,
            vacancy_pct: 0.05,
            capex_pct: 0.05,
            management_pct: 0.08,
            fixed_monthly_costs: 250.0,
            value_growth_rate: 0.03,
            heloc: None,
        }],
        modes: ModeConfig::default(),
        cash_policy: CashPolicy::SavingsFloor,
        contributions_reduce_cash: false,
        caution_threshold: 10_000.0,
        opportunity_threshold: 20_000.0,
    }
}

fn build_config(payload: ScenarioPayload) -> ScenarioConfig {
    let mut config = default_config();

    if let Some(v) = payload.horizon_years {
        config.horizon_years = v;
    }
    if let Some(v) = payload.starting_cash {
        config.starting_cash = v;
    }
    if let Some(incomes) = payload.incomes {
        config.incomes = incomes.into_iter().map(IncomePayload::build).collect();
    }
    if let Some(expenses) = payload.expenses {
        if let Some(v) = expenses.base_annual {
            config.expenses.base_annual = v;
        }
        if let Some(v) = expenses.inflation_rate {
            config.expenses.inflation_rate = v / 100.0;
        }
        if let Some(v) = expenses.stress_test {
            config.expenses.stress_test = v;
        }
    }

    if payload.include_home == Some(false) {
        config.home = None;
    } else if let Some(home) = payload.home {
        let mut built = config.home.take().unwrap_or(HomeConfig {
            value: 0.0,
            loan_amount: 0.0,
            rate: 0.0,
            term_years: 30,
            start_year: 1,
            heloc: None,
        });
        if let Some(v) = home.value {
            built.value = v;
        }
        if let Some(v) = home.loan_amount {
            built.loan_amount = v;
        }
        if let Some(v) = home.rate {
            built.rate = v / 100.0;
        }
        if let Some(v) = home.term_years {
            built.term_years = v;
        }
        if let Some(v) = home.start_year {
            built.start_year = v;
        }
        if let Some(drawn) = home.heloc_drawn {
            built.heloc = Some(HouseholdHelocConfig {
                drawn,
                term_years: home.heloc_term_years.unwrap_or(10),
                start_year: home.heloc_start_year.unwrap_or(1),
            });
        }
        config.home = Some(built);
    }

    if payload.include_student_loan == Some(false) {
        config.student_loan = None;
    } else if let Some(loan) = payload.student_loan {
        let mut built = config.student_loan.take().unwrap_or(StudentLoanConfig {
            balance: 0.0,
            rate: 0.0,
            term_years: 20,
            start_year: 1,
            forgiveness_year: None,
        });
        if let Some(v) = loan.balance {
            built.balance = v;
        }
        if let Some(v) = loan.rate {
            built.rate = v / 100.0;
        }
        if let Some(v) = loan.term_years {
            built.term_years = v;
        }
        if let Some(v) = loan.start_year {
            built.start_year = v;
        }
        if let Some(v) = loan.forgiveness_year {
            built.forgiveness_year = Some(v);
        }
        config.student_loan = Some(built);
    }

    if let Some(retirement) = payload.retirement {
        config.retirement = retirement
            .into_iter()
            .map(RetirementPayload::build)
            .collect();
    }
    if let Some(properties) = payload.properties {
        config.properties = properties
            .into_iter()
            .map(PropertyPayload::build)
            .collect();
    }

    if let Some(v) = payload.push_hard {
        config.modes.push_hard = v;
    }
    if let Some(v) = payload.push_bonus {
        config.modes.push_bonus = v;
    }
    if let Some(v) = payload.push_years {
        config.modes.push_years = v;
    }
    if let Some(v) = payload.income_drop {
        config.modes.income_drop = v;
    }
    if let Some(v) = payload.frugal_years {
        config.modes.frugal_years = v;
    }
    if let Some(v) = payload.cut_discretionary {
        config.modes.cut_discretionary = v;
    }
    if let Some(v) = payload.cut_secondary {
        config.modes.cut_secondary = v;
    }
    if let Some(v) = payload.suspend_retirement {
        config.modes.suspend_retirement = v;
    }

    if let Some(v) = payload.cash_policy {
        config.cash_policy = v.into();
    }
    if let Some(v) = payload.contributions_reduce_cash {
        config.contributions_reduce_cash = v;
    }
    if let Some(v) = payload.caution_threshold {
        config.caution_threshold = v;
    }
    if let Some(v) = payload.opportunity_threshold {
        config.opportunity_threshold = v;
    }

    config
}

fn project_from_payload(payload: ScenarioPayload) -> Result<ProjectResponse, String> {
    let config = build_config(payload);
    let years = run_projection(&config).map_err(|e| e.to_string())?;
    Ok(ProjectResponse {
        horizon_years: config.horizon_years,
        starting_cash: config.starting_cash,
        cash_policy: match config.cash_policy {
            CashPolicy::SavingsFloor => "savings-floor",
            CashPolicy::ReinvestSurplus => "reinvest-surplus",
        },
        income_sources: config.incomes.iter().map(|i| i.name.clone()).collect(),
        property_names: config.properties.iter().map(|p| p.name.clone()).collect(),
        years,
    })
}

/// Parses a scenario payload from JSON and runs the projection. Backs the
/// `project` CLI subcommand.
pub fn project_from_json(json: &str) -> Result<ProjectResponse, String> {
    let payload = serde_json::from_str::<ScenarioPayload>(json)
        .map_err(|e| format!("invalid JSON payload: {e}"))?;
    project_from_payload(payload)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("projection API listening on http://{addr}");

    axum::serve(listener, app).await
}

/// Query strings can only override the flat scalar fields (`horizonYears`,
/// `pushHard`, `cashPolicy`, ...); the list and nested sections (`incomes`,
/// `properties`, `frugalYears`, `home`, ...) require a POST body.
async fn project_get_handler(Query(payload): Query<ScenarioPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ScenarioPayload>) -> Response {
    project_handler_impl(payload)
}

fn project_handler_impl(payload: ScenarioPayload) -> Response {
    match project_from_payload(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => {
            tracing::warn!("rejected scenario: {msg}");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RiskLevel;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_scenario_projects_full_horizon() {
        let response = project_from_json("{}").expect("default scenario is valid");
        assert_eq!(response.horizon_years, 20);
        assert_eq!(response.years.len(), 20);
        assert_eq!(response.years[0].year, 1);
        assert_eq!(response.years[19].year, 20);
        assert_eq!(response.cash_policy, "savings-floor");
        assert_eq!(response.income_sources.len(), 3);
        assert_eq!(response.property_names, vec!["rental-1".to_string()]);
    }

    #[test]
    fn push_hard_toggle_alone_boosts_early_years() {
        let baseline = project_from_json("{}").expect("valid scenario");
        let pushed = project_from_json(r#"{ "pushHard": true }"#).expect("valid scenario");

        assert_approx(
            pushed.years[0].income_total - baseline.years[0].income_total,
            10_000.0,
        );
        assert_approx(
            pushed.years[1].income_total - baseline.years[1].income_total,
            10_000.0,
        );
        assert_approx(pushed.years[2].income_total, baseline.years[2].income_total);
    }

    #[test]
    fn payload_overrides_layer_over_defaults() {
        let json = r#"{
          "horizonYears": 5,
          "startingCash": 25000,
          "expenses": { "baseAnnual": 60000, "inflationRate": 2, "stressTest": true },
          "cashPolicy": "reinvest-surplus",
          "cautionThreshold": 5000
        }"#;
        let payload = serde_json::from_str::<ScenarioPayload>(json).expect("valid json");
        let config = build_config(payload);

        assert_eq!(config.horizon_years, 5);
        assert_approx(config.starting_cash, 25_000.0);
        assert_approx(config.expenses.base_annual, 60_000.0);
        assert_approx(config.expenses.inflation_rate, 0.02);
        assert!(config.expenses.stress_test);
        assert_eq!(config.cash_policy, CashPolicy::ReinvestSurplus);
        assert_approx(config.caution_threshold, 5_000.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.incomes.len(), 3);
        assert!(config.home.is_some());
    }

    #[test]
    fn percent_fields_convert_to_fractions() {
        let json = r#"{
          "incomes": [{ "name": "solo", "baseAnnual": 80000, "growthRate": 3 }],
          "home": { "rate": 6.5 },
          "studentLoan": { "rate": 6.8 },
          "retirement": [{
            "name": "401k",
            "contributionPctOfIncome": 10,
            "employerMatch": 4,
            "matchCap": 6,
            "growthRate": 7
          }],
          "properties": [{ "name": "r1", "value": 300000, "downPaymentPct": 25, "mortgageRate": 6 }]
        }"#;
        let payload = serde_json::from_str::<ScenarioPayload>(json).expect("valid json");
        let config = build_config(payload);

        assert_approx(config.incomes[0].growth_rate, 0.03);
        assert_approx(config.home.as_ref().unwrap().rate, 0.065);
        assert_approx(config.student_loan.as_ref().unwrap().rate, 0.068);
        let account = &config.retirement[0];
        assert!(matches!(
            account.contribution,
            ContributionRule::PercentOfIncome(pct) if (pct - 0.10).abs() <= EPS
        ));
        assert_approx(account.employer_match_rate, 0.04);
        assert_approx(account.match_cap_rate, 0.06);
        assert_approx(account.growth_rate, 0.07);
        let property = &config.properties[0];
        assert_approx(property.down_payment_pct, 0.25);
        assert_approx(property.mortgage_rate, 0.06);
    }

    #[test]
    fn sections_can_be_dropped_or_emptied() {
        let json = r#"{
          "includeHome": false,
          "includeStudentLoan": false,
          "retirement": [],
          "properties": []
        }"#;
        let payload = serde_json::from_str::<ScenarioPayload>(json).expect("valid json");
        let config = build_config(payload);

        assert!(config.home.is_none());
        assert!(config.student_loan.is_none());
        assert!(config.retirement.is_empty());
        assert!(config.properties.is_empty());
    }

    #[test]
    fn home_heloc_builds_from_flattened_fields() {
        let json = r#"{
          "home": { "helocDrawn": 50000, "helocTermYears": 5, "helocStartYear": 2 }
        }"#;
        let payload = serde_json::from_str::<ScenarioPayload>(json).expect("valid json");
        let config = build_config(payload);

        let heloc = config.home.as_ref().unwrap().heloc.as_ref().unwrap();
        assert_approx(heloc.drawn, 50_000.0);
        assert_eq!(heloc.term_years, 5);
        assert_eq!(heloc.start_year, 2);
    }

    #[test]
    fn property_heloc_requires_draw_year() {
        let json = r#"{
          "properties": [
            { "name": "plain", "value": 200000 },
            { "name": "leveraged", "value": 200000, "helocDrawYear": 3,
              "helocDrawAmount": 40000, "helocMaxCltv": 75, "helocRate": 8 }
          ]
        }"#;
        let payload = serde_json::from_str::<ScenarioPayload>(json).expect("valid json");
        let config = build_config(payload);

        assert!(config.properties[0].heloc.is_none());
        let heloc = config.properties[1].heloc.as_ref().unwrap();
        assert_eq!(heloc.draw_year, 3);
        assert_approx(heloc.draw_amount, 40_000.0);
        assert_approx(heloc.max_cltv, 0.75);
        assert_approx(heloc.rate, 0.08);
    }

    #[test]
    fn existing_property_defaults_to_purchase_year_zero() {
        let json = r#"{
          "properties": [{ "name": "held", "existing": true, "value": 250000,
                           "startingMortgageBalance": 150000 }]
        }"#;
        let payload = serde_json::from_str::<ScenarioPayload>(json).expect("valid json");
        let config = build_config(payload);

        let property = &config.properties[0];
        assert_eq!(property.purchase_year, 0);
        assert_eq!(property.starting_mortgage_balance, Some(150_000.0));
        assert_eq!(property.rent_start_year, 1);
    }

    #[test]
    fn invalid_scenario_reports_error_string() {
        let err = project_from_json(r#"{ "horizonYears": 0 }"#).expect_err("must reject");
        assert!(err.contains("horizon_years"));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = project_from_json("{ not json").expect_err("must reject");
        assert!(err.contains("invalid JSON payload"));
    }

    #[test]
    fn mode_flags_flow_through_to_projection() {
        let json = r#"{
          "horizonYears": 3,
          "incomes": [{ "name": "solo", "baseAnnual": 90000 }],
          "expenses": { "baseAnnual": 75000, "inflationRate": 0 },
          "includeHome": false,
          "includeStudentLoan": false,
          "retirement": [],
          "properties": [],
          "pushHard": true,
          "pushBonus": 10000,
          "pushYears": 1
        }"#;
        let response = project_from_json(json).expect("valid scenario");
        assert_approx(response.years[0].income_total, 100_000.0);
        assert_approx(response.years[1].income_total, 90_000.0);
    }

    #[test]
    fn response_serializes_with_camel_case_keys() {
        let json = r#"{
          "horizonYears": 1,
          "incomes": [{ "name": "solo", "baseAnnual": 50000 }],
          "expenses": { "baseAnnual": 60000, "inflationRate": 0 },
          "includeHome": false,
          "includeStudentLoan": false,
          "retirement": [],
          "properties": []
        }"#;
        let response = project_from_json(json).expect("valid scenario");
        assert_eq!(response.years[0].risk, RiskLevel::Critical);

        let rendered = serde_json::to_string(&response).expect("serializes");
        assert!(rendered.contains("\"horizonYears\""));
        assert!(rendered.contains("\"startingCash\""));
        assert!(rendered.contains("\"cashPolicy\":\"savings-floor\""));
        assert!(rendered.contains("\"incomeSources\""));
        assert!(rendered.contains("\"propertyNames\""));
        assert!(rendered.contains("\"netCashFlow\""));
        assert!(rendered.contains("\"incomeBySource\""));
        assert!(rendered.contains("\"retirementByAccount\""));
        assert!(rendered.contains("\"activeProperties\""));
        assert!(rendered.contains("\"risk\":\"critical\""));
    }
}
