//! Customer lookups shared by the webhook handlers.

use crate::{db::DbPool, error::AppError, models::customer::CustomerAddress};

/// Whether the customer ID is known to the bank.
///
/// Existence is defined by the customer holding at least one account, which
/// is what every webhook validates before doing real work.
pub async fn exists(pool: &DbPool, customer_id: i64) -> Result<bool, AppError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE customer_id = $1)",
    )
    .bind(customer_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// The customer's first name, or an empty string when the profile row is
/// missing (the model prompt tolerates a blank name).
pub async fn first_name(pool: &DbPool, customer_id: i64) -> Result<String, AppError> {
    let name = sqlx::query_scalar::<_, String>(
        "SELECT first_name FROM customers WHERE customer_id = $1",
    )
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;

    Ok(name.unwrap_or_default())
}

/// Days the customer has been on the book. A missing profile counts as a
/// brand-new customer.
pub async fn tenure_days(pool: &DbPool, customer_id: i64) -> Result<i32, AppError> {
    let days = sqlx::query_scalar::<_, i32>(
        "SELECT age_on_book FROM customers WHERE customer_id = $1",
    )
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;

    Ok(days.unwrap_or(0))
}

/// The customer's postal address columns, if a profile row exists.
pub async fn postal_address(
    pool: &DbPool,
    customer_id: i64,
) -> Result<Option<CustomerAddress>, AppError> {
    let address = sqlx::query_as::<_, CustomerAddress>(
        r#"
        SELECT address_line_2, address_line_3, city, state, plus_code
        FROM customers
        WHERE customer_id = $1
        "#,
    )
    .bind(customer_id)
    .fetch_optional(pool)
    .await?;

    Ok(address)
}
