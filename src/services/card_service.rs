//! Credit card issuance.

use chrono::Utc;
use rand::Rng;

use crate::{db::DbPool, error::AppError};

/// All cards are issued with the same fixed expiry.
const EXPIRATION_MONTH: i32 = 10;
const EXPIRATION_YEAR: i32 = 2027;

/// Record a credit card for the customer.
///
/// # Process
///
/// 1. Generate a random 12-digit card number
/// 2. If the customer does not hold this card yet, insert a new row
/// 3. Otherwise replace the card number and bump the last-updated date
///
/// The check and the write are two separate statements; concurrent
/// duplicate submissions race, with the table's UNIQUE constraint as the
/// backstop.
pub async fn issue_card(
    pool: &DbPool,
    customer_id: i64,
    credit_card_name: &str,
) -> Result<(), AppError> {
    let card_number: i64 = rand::rng().random_range(100_000_000_000..=999_999_999_999);
    let today = Utc::now().date_naive();

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM credit_cards WHERE customer_id = $1 AND credit_card_name = $2",
    )
    .bind(customer_id)
    .bind(credit_card_name)
    .fetch_one(pool)
    .await?;

    if existing == 0 {
        sqlx::query(
            r#"
            INSERT INTO credit_cards (
                customer_id,
                credit_card_name,
                credit_card_number,
                credit_card_expiration_month,
                credit_card_expiration_year,
                international_transaction_enabled,
                credit_card_last_updated
            )
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            "#,
        )
        .bind(customer_id)
        .bind(credit_card_name)
        .bind(card_number)
        .bind(EXPIRATION_MONTH)
        .bind(EXPIRATION_YEAR)
        .bind(today)
        .execute(pool)
        .await?;

        tracing::info!(customer_id, credit_card_name, "credit card issued");
    } else {
        sqlx::query(
            r#"
            UPDATE credit_cards
            SET credit_card_number = $3, credit_card_last_updated = $4
            WHERE customer_id = $1 AND credit_card_name = $2
            "#,
        )
        .bind(customer_id)
        .bind(credit_card_name)
        .bind(card_number)
        .bind(today)
        .execute(pool)
        .await?;

        tracing::info!(customer_id, credit_card_name, "credit card re-issued");
    }

    Ok(())
}
