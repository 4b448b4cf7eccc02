//! Financial snapshot battery and account health classification.
//!
//! The snapshot is the recurring pattern of this service: a battery of
//! independent aggregate statements dispatched concurrently against the
//! pool and collected into one struct. All statements run with no ordering
//! guarantee between them; the first failure fails the whole battery (no
//! retry, no partial results).

use std::fmt;

use crate::{
    db::DbPool, error::AppError, models::investment::SchemeReturn,
    services::customer_service,
};

/// Deposit products counted as assets.
pub const ASSET_PRODUCTS: &[&str] = &[
    "Savings A/C",
    "Savings Salary A/C",
    "Premium Current A/C",
    "Fixed Deposit",
    "Flexi Deposit",
];

/// Liquid deposit products backing the "average monthly balance" figure.
const LIQUID_PRODUCTS: &[&str] = &["Savings A/C", "Savings Salary A/C", "Premium Current A/C"];

/// Credit, loan, and brokerage products counted as debt.
const DEBT_PRODUCTS: &[&str] = &[
    "Gold Card",
    "Medical Insurance",
    "Premium Travel Card",
    "Platinum Card",
    "Personal Loan",
    "Vehicle Loan",
    "Consumer Durables Loan",
    "Broking A/C",
];

const FIXED_DEPOSIT_PRODUCTS: &[&str] = &["Fixed Deposit"];

/// Mutual fund risk categories above this count as high risk.
const HIGH_RISK_CATEGORY: i32 = 4;

/// Account health classification derived from the snapshot ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Healthy,
    NeedsAttention,
    Concerning,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountStatus::Healthy => "Healthy",
            AccountStatus::NeedsAttention => "Needs Attention",
            AccountStatus::Concerning => "Concerning",
        }
    }

    /// The credit card product offered for this account status.
    pub fn recommended_card(self) -> &'static str {
        match self {
            AccountStatus::Healthy => "Cymbal Luxury Lifestyle Card",
            AccountStatus::NeedsAttention => "Cymbal No-annual-fee Rewards Card",
            AccountStatus::Concerning => "Cymbal Secured Credit Card",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the account health and card recommendation webhooks need to
/// know about a customer, collected in one battery. All amounts in paise.
#[derive(Debug, Clone, Default)]
pub struct FinancialSnapshot {
    pub first_name: String,
    pub asset_paise: i64,
    pub debt_paise: i64,
    pub liquid_balance_paise: i64,
    pub fixed_deposit_paise: i64,
    pub mutual_fund_paise: i64,
    pub high_risk_paise: i64,
    pub total_income_paise: i64,
    pub total_expenditure_paise: i64,
    pub average_monthly_expense_paise: i64,
    pub last_month_expense_paise: i64,
    pub scheme_returns: Vec<SchemeReturn>,
}

impl FinancialSnapshot {
    /// Total invested amount: fixed deposits plus mutual funds.
    pub fn total_investment_paise(&self) -> i64 {
        self.fixed_deposit_paise + self.mutual_fund_paise
    }

    /// Classify account health from expenditure, asset, debt, and
    /// high-risk-investment ratios.
    ///
    /// - **Healthy**: expenditure < 0.75 × income, assets ≥ 0.2 × income,
    ///   debt < 0.3 × assets, high risk < 0.3 × investment — all four.
    /// - **Needs Attention**: not Healthy, and any single ratio sits in the
    ///   warning band (expenditure in [0.75, 0.9) of income, assets in
    ///   (0.1, 0.2) of income, debt in [0.3, 0.75) of assets, high risk in
    ///   [0.3, 0.8) of investment).
    /// - **Concerning**: everything else.
    pub fn account_status(&self) -> AccountStatus {
        let income = self.total_income_paise as f64;
        let expenditure = self.total_expenditure_paise as f64;
        let assets = self.asset_paise as f64;
        let debt = self.debt_paise as f64;
        let investment = self.total_investment_paise() as f64;
        let high_risk = self.high_risk_paise as f64;

        if expenditure < 0.75 * income
            && assets >= 0.2 * income
            && debt < 0.3 * assets
            && high_risk < 0.3 * investment
        {
            AccountStatus::Healthy
        } else if (expenditure >= 0.75 * income && expenditure < 0.9 * income)
            || (assets < 0.2 * income && assets > 0.1 * income)
            || (debt >= 0.3 * assets && debt < 0.75 * assets)
            || (high_risk >= 0.3 * investment && high_risk < 0.8 * investment)
        {
            AccountStatus::NeedsAttention
        } else {
            AccountStatus::Concerning
        }
    }
}

/// Run the full analytical battery for one customer.
///
/// Twelve statements are dispatched concurrently; each checks out its own
/// pool connection. Aggregates over empty sets come back as zero.
pub async fn financial_snapshot(
    pool: &DbPool,
    customer_id: i64,
) -> Result<FinancialSnapshot, AppError> {
    let (
        asset_paise,
        debt_paise,
        liquid_balance_paise,
        fixed_deposit_paise,
        mutual_fund_paise,
        high_risk_paise,
        total_income_paise,
        total_expenditure_paise,
        average_monthly_expense_paise,
        last_month_expense_paise,
        first_name,
        scheme_returns,
    ) = tokio::try_join!(
        balance_for_products(pool, customer_id, ASSET_PRODUCTS),
        balance_for_products(pool, customer_id, DEBT_PRODUCTS),
        balance_for_products(pool, customer_id, LIQUID_PRODUCTS),
        balance_for_products(pool, customer_id, FIXED_DEPOSIT_PRODUCTS),
        mutual_fund_total(pool, customer_id),
        high_risk_total(pool, customer_id),
        transaction_total(pool, customer_id, "Credit"),
        transaction_total(pool, customer_id, "Debit"),
        average_monthly_expense(pool, customer_id),
        last_month_expense(pool, customer_id),
        customer_service::first_name(pool, customer_id),
        scheme_returns(pool, customer_id),
    )?;

    Ok(FinancialSnapshot {
        first_name,
        asset_paise,
        debt_paise,
        liquid_balance_paise,
        fixed_deposit_paise,
        mutual_fund_paise,
        high_risk_paise,
        total_income_paise,
        total_expenditure_paise,
        average_monthly_expense_paise,
        last_month_expense_paise,
        scheme_returns,
    })
}

/// Deposit assets only — the figure the dealer locator segments on.
pub async fn deposit_assets(pool: &DbPool, customer_id: i64) -> Result<i64, AppError> {
    balance_for_products(pool, customer_id, ASSET_PRODUCTS).await
}

/// Sum of average monthly balances across the given products.
async fn balance_for_products(
    pool: &DbPool,
    customer_id: i64,
    products: &[&str],
) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(avg_monthly_balance_paise), 0)::BIGINT
        FROM accounts
        WHERE customer_id = $1 AND product = ANY($2)
        "#,
    )
    .bind(customer_id)
    .bind(products)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Total invested across the customer's mutual fund holdings.
async fn mutual_fund_total(pool: &DbPool, customer_id: i64) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(amount_invested_paise), 0)::BIGINT
        FROM mutual_fund_holdings
        WHERE account_id IN (SELECT account_id FROM accounts WHERE customer_id = $1)
        "#,
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Invested amount sitting in high-risk schemes.
async fn high_risk_total(pool: &DbPool, customer_id: i64) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(amount_invested_paise), 0)::BIGINT
        FROM mutual_fund_holdings
        WHERE risk_category > $2
          AND account_id IN (SELECT account_id FROM accounts WHERE customer_id = $1)
        "#,
    )
    .bind(customer_id)
    .bind(HIGH_RISK_CATEGORY)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Lifetime credit or debit total across all of the customer's accounts.
async fn transaction_total(
    pool: &DbPool,
    customer_id: i64,
    indicator: &str,
) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(transaction_amount_paise), 0)::BIGINT
        FROM account_transactions
        WHERE debit_credit_indicator = $2
          AND account_id IN (SELECT account_id FROM accounts WHERE customer_id = $1)
        "#,
    )
    .bind(customer_id)
    .bind(indicator)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Average of the customer's calendar-month transaction totals.
async fn average_monthly_expense(pool: &DbPool, customer_id: i64) -> Result<i64, AppError> {
    let average = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(AVG(monthly_total), 0)::BIGINT
        FROM (
            SELECT SUM(transaction_amount_paise) AS monthly_total
            FROM account_transactions
            WHERE account_id IN (SELECT account_id FROM accounts WHERE customer_id = $1)
            GROUP BY date_trunc('month', transaction_date)
        ) AS monthly_totals
        "#,
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await?;

    Ok(average)
}

/// Transaction total for the previous calendar month.
async fn last_month_expense(pool: &DbPool, customer_id: i64) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(transaction_amount_paise), 0)::BIGINT
        FROM account_transactions
        WHERE account_id IN (SELECT account_id FROM accounts WHERE customer_id = $1)
          AND transaction_date >= date_trunc('month', CURRENT_DATE) - INTERVAL '1 month'
          AND transaction_date < date_trunc('month', CURRENT_DATE)
        "#,
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Per-scheme returns, scaled to rupee amounts in SQL.
async fn scheme_returns(pool: &DbPool, customer_id: i64) -> Result<Vec<SchemeReturn>, AppError> {
    let returns = sqlx::query_as::<_, SchemeReturn>(
        r#"
        SELECT scheme_name,
               (amount_invested_paise * one_month_return)::BIGINT AS one_month_return_paise,
               (amount_invested_paise * ttm_return)::BIGINT AS ttm_return_paise
        FROM mutual_fund_holdings
        WHERE account_id IN (SELECT account_id FROM accounts WHERE customer_id = $1)
        "#,
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    Ok(returns)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A customer comfortably inside every healthy band.
    fn healthy_snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            total_income_paise: 1_000_000,
            total_expenditure_paise: 500_000,
            asset_paise: 400_000,
            debt_paise: 50_000,
            fixed_deposit_paise: 150_000,
            mutual_fund_paise: 50_000,
            high_risk_paise: 10_000,
            ..FinancialSnapshot::default()
        }
    }

    #[test]
    fn all_ratios_in_band_is_healthy() {
        assert_eq!(healthy_snapshot().account_status(), AccountStatus::Healthy);
    }

    #[test]
    fn expenditure_at_three_quarters_of_income_needs_attention() {
        let mut snapshot = healthy_snapshot();
        snapshot.total_expenditure_paise = 750_000;
        assert_eq!(snapshot.account_status(), AccountStatus::NeedsAttention);
    }

    #[test]
    fn expenditure_at_ninety_percent_of_income_is_concerning() {
        let mut snapshot = healthy_snapshot();
        snapshot.total_expenditure_paise = 900_000;
        // Out of the warning band, and no other band catches it
        assert_eq!(snapshot.account_status(), AccountStatus::Concerning);
    }

    #[test]
    fn thin_asset_cushion_needs_attention() {
        let mut snapshot = healthy_snapshot();
        // Between 0.1 and 0.2 of income
        snapshot.asset_paise = 150_000;
        assert_eq!(snapshot.account_status(), AccountStatus::NeedsAttention);
    }

    #[test]
    fn elevated_debt_needs_attention() {
        let mut snapshot = healthy_snapshot();
        // Exactly 0.3 of assets leaves the healthy band and enters the warning band
        snapshot.debt_paise = 120_000;
        assert_eq!(snapshot.account_status(), AccountStatus::NeedsAttention);
    }

    #[test]
    fn debt_at_three_quarters_of_assets_is_concerning() {
        let mut snapshot = healthy_snapshot();
        snapshot.debt_paise = 300_000;
        assert_eq!(snapshot.account_status(), AccountStatus::Concerning);
    }

    #[test]
    fn high_risk_concentration_escalates() {
        let mut warning = healthy_snapshot();
        // investment = 200_000; 0.3 of it is 60_000
        warning.high_risk_paise = 60_000;
        assert_eq!(warning.account_status(), AccountStatus::NeedsAttention);

        let mut concerning = healthy_snapshot();
        // At 0.8 of investment the warning band no longer applies
        concerning.high_risk_paise = 160_000;
        assert_eq!(concerning.account_status(), AccountStatus::Concerning);
    }

    #[test]
    fn zero_activity_customer_is_concerning() {
        assert_eq!(
            FinancialSnapshot::default().account_status(),
            AccountStatus::Concerning
        );
    }

    #[test]
    fn total_investment_combines_deposits_and_funds() {
        let snapshot = healthy_snapshot();
        assert_eq!(snapshot.total_investment_paise(), 200_000);
    }

    #[test]
    fn status_maps_to_card_tier() {
        assert_eq!(
            AccountStatus::Healthy.recommended_card(),
            "Cymbal Luxury Lifestyle Card"
        );
        assert_eq!(
            AccountStatus::NeedsAttention.recommended_card(),
            "Cymbal No-annual-fee Rewards Card"
        );
        assert_eq!(
            AccountStatus::Concerning.recommended_card(),
            "Cymbal Secured Credit Card"
        );
    }

    #[test]
    fn status_renders_its_display_name() {
        assert_eq!(AccountStatus::NeedsAttention.to_string(), "Needs Attention");
    }
}
