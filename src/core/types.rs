use serde::Serialize;

pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 50;

/// Monthly cash-flow figures and annual rate assumptions for one projection.
///
/// Rates are annual percentages (`4.5` means 4.5%), not fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialProfile {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub monthly_savings: f64,
    pub inflation_rate: f64,
    pub investment_return_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearRecord {
    pub year: u32,
    pub annual_income: f64,
    pub annual_expenses: f64,
    pub annual_savings: f64,
    pub accumulated_savings: f64,
    pub net_cash_flow: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub final_wealth: f64,
}
