use super::error::ValidationError;
use super::types::{FinancialProfile, MAX_YEARS, MIN_YEARS, ProjectionSummary, YearRecord};

const MONTHS_PER_YEAR: f64 = 12.0;

pub fn project(
    profile: &FinancialProfile,
    years: u32,
) -> Result<Vec<YearRecord>, ValidationError> {
    validate(profile, years)?;

    let inflation = profile.inflation_rate / 100.0;
    let investment_return = profile.investment_return_rate / 100.0;

    let mut records = Vec::with_capacity(years as usize);
    let mut accumulated = 0.0;
    for year in 1..=years {
        let multiplier = inflation_multiplier(inflation, year);
        let annual_income = profile.monthly_income * MONTHS_PER_YEAR * multiplier;
        let annual_expenses = profile.monthly_expenses * MONTHS_PER_YEAR * multiplier;
        let annual_savings = profile.monthly_savings * MONTHS_PER_YEAR * multiplier;

        // Year 1 savings open the balance and earn a full year; later years add at year end.
        accumulated = if year == 1 {
            growth_step(accumulated + annual_savings, investment_return, 0.0)
        } else {
            growth_step(accumulated, investment_return, annual_savings)
        };

        records.push(YearRecord {
            year,
            annual_income,
            annual_expenses,
            annual_savings,
            accumulated_savings: accumulated,
            net_cash_flow: annual_income - annual_expenses,
        });
    }
    Ok(records)
}

pub fn validate(profile: &FinancialProfile, years: u32) -> Result<(), ValidationError> {
    if !(MIN_YEARS..=MAX_YEARS).contains(&years) {
        return Err(ValidationError::OutOfRange {
            years: i64::from(years),
        });
    }

    for (field, value) in [
        ("monthly_income", profile.monthly_income),
        ("monthly_expenses", profile.monthly_expenses),
        ("monthly_savings", profile.monthly_savings),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidMagnitude { field, value });
        }
    }

    // Rates may be negative or very large; only non-finite values are rejected.
    for (field, value) in [
        ("inflation_rate", profile.inflation_rate),
        ("investment_return_rate", profile.investment_return_rate),
    ] {
        if !value.is_finite() {
            return Err(ValidationError::InvalidMagnitude { field, value });
        }
    }

    Ok(())
}

pub fn inflation_multiplier(inflation: f64, year: u32) -> f64 {
    let exponent = i32::try_from(year.saturating_sub(1)).unwrap_or(i32::MAX);
    (1.0 + inflation).powi(exponent)
}

pub fn growth_step(accumulated: f64, investment_return: f64, contribution: f64) -> f64 {
    accumulated * (1.0 + investment_return) + contribution
}

pub fn summarize(records: &[YearRecord]) -> ProjectionSummary {
    let mut summary = ProjectionSummary {
        years: records.len() as u32,
        total_income: 0.0,
        total_expenses: 0.0,
        total_savings: 0.0,
        final_wealth: records.last().map_or(0.0, |r| r.accumulated_savings),
    };
    for record in records {
        summary.total_income += record.annual_income;
        summary.total_expenses += record.annual_expenses;
        summary.total_savings += record.annual_savings;
    }
    summary
}
