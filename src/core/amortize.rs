//! Fixed-rate amortization math shared by the mortgage, HELOC and student
//! loan projections. Pure functions: same inputs always agree.

/// Monthly payment for a fixed-rate loan. `annual_rate` is a fraction
/// (0.065 = 6.5%). Zero rate falls back to straight-line so the formula
/// never divides by zero; non-positive principal pays nothing.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    if principal <= 0.0 || term_years == 0 {
        return 0.0;
    }
    let months = (term_years * 12) as f64;
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return principal / months;
    }
    principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-months))
}

/// Closed-form remaining balance after `months_paid` payments of the value
/// computed by [`monthly_payment`]. Months are clamped to the term and the
/// result is floored at zero so floating-point overshoot past full
/// amortization never reports a negative balance.
pub fn remaining_balance(principal: f64, annual_rate: f64, term_years: u32, months_paid: u32) -> f64 {
    if principal <= 0.0 || term_years == 0 {
        return 0.0;
    }
    let total_months = term_years * 12;
    let paid = months_paid.min(total_months) as f64;
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return (principal * (1.0 - paid / total_months as f64)).max(0.0);
    }
    let growth = (1.0 + monthly_rate).powf(paid);
    let payment = monthly_payment(principal, annual_rate, term_years);
    (principal * growth - payment * (growth - 1.0) / monthly_rate).max(0.0)
}
