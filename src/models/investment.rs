//! Mutual fund scheme return rows.

use serde::Serialize;

/// Per-scheme returns for a customer's mutual fund holdings.
///
/// The returns are already scaled by the invested amount in SQL
/// (`amount_invested_paise * return_fraction`), so both fields are rupee
/// amounts in paise, not fractions.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SchemeReturn {
    pub scheme_name: String,
    pub one_month_return_paise: i64,
    pub ttm_return_paise: i64,
}
