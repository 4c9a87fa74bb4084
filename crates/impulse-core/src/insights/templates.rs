//! Fixed insight texts per factor

use crate::models::Factor;

/// Static summary and detail for one factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightTemplate {
    pub summary: &'static str,
    pub detail: &'static str,
}

pub fn insight_template(factor: Factor) -> InsightTemplate {
    match factor {
        Factor::Binge => InsightTemplate {
            summary: "Detected binge spending cycles",
            detail: "Multiple discretionary purchases clustered in short windows. Consider cooldown rules and pre-commit budgets.",
        },
        Factor::Weekend => InsightTemplate {
            summary: "Weekend trigger detected",
            detail: "Discretionary spend is higher on weekends. Try weekend budget caps and planned activities.",
        },
        Factor::Payday => InsightTemplate {
            summary: "Post-payday spike",
            detail: "Spend increases near payday. Consider automatic transfers and 48-hour purchase delays.",
        },
    }
}
