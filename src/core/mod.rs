mod engine;
mod error;
mod types;

pub use engine::{growth_step, inflation_multiplier, project, summarize, validate};
pub use error::ValidationError;
pub use types::{FinancialProfile, MAX_YEARS, MIN_YEARS, ProjectionSummary, YearRecord};
