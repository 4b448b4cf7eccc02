//! Partner car dealer rows and distance-ranked results.

use serde::Serialize;

/// A partner car dealer from the `car_dealers` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CarDealer {
    pub brand: String,
    pub dealer_name: String,
    pub address: String,
}

impl CarDealer {
    /// Destination string for the distance matrix lookup: the showroom name
    /// followed by its street address.
    pub fn destination(&self) -> String {
        format!("{}, {}", self.dealer_name, self.address)
    }
}

/// A dealer paired with its road distance from the customer's address.
#[derive(Debug, Clone, Serialize)]
pub struct DealerDistance {
    pub dealer: CarDealer,
    pub meters: i64,
}
