//! Partner car dealer segmentation and distance ranking.

use futures::future;

use crate::{
    db::DbPool,
    error::AppError,
    maps::DistanceMatrixClient,
    models::dealer::{CarDealer, DealerDistance},
};

/// How many showrooms the reply presents.
pub const NEAREST_DEALER_COUNT: usize = 5;

/// Deposit assets at or above one crore put the customer in the Premium
/// dealer segment.
const PREMIUM_ASSET_THRESHOLD_PAISE: i64 = 1_000_000_000;

/// Dealer segment for a customer with the given deposit assets.
pub fn dealer_category(deposit_asset_paise: i64) -> &'static str {
    if deposit_asset_paise < PREMIUM_ASSET_THRESHOLD_PAISE {
        "Standard"
    } else {
        "Premium"
    }
}

/// All partner dealers in one segment.
pub async fn dealers_in_category(
    pool: &DbPool,
    category: &str,
) -> Result<Vec<CarDealer>, AppError> {
    let dealers = sqlx::query_as::<_, CarDealer>(
        "SELECT brand, dealer_name, address FROM car_dealers WHERE category = $1",
    )
    .bind(category)
    .fetch_all(pool)
    .await?;

    Ok(dealers)
}

/// Rank dealers by road distance from the customer's address and keep the
/// closest few.
///
/// One distance lookup per dealer, all dispatched concurrently with no
/// ordering guarantee; any failed lookup fails the whole ranking.
pub async fn nearest_dealers(
    maps: &DistanceMatrixClient,
    origin: &str,
    dealers: Vec<CarDealer>,
) -> Result<Vec<DealerDistance>, AppError> {
    let lookups = dealers.into_iter().map(|dealer| async move {
        let meters = maps
            .road_distance_meters(origin, &dealer.destination())
            .await?;
        Ok::<DealerDistance, AppError>(DealerDistance { dealer, meters })
    });

    let ranked = future::try_join_all(lookups).await?;
    Ok(nearest(ranked, NEAREST_DEALER_COUNT))
}

/// Sort ascending by distance and keep at most `limit` entries.
fn nearest(mut ranked: Vec<DealerDistance>, limit: usize) -> Vec<DealerDistance> {
    ranked.sort_by_key(|entry| entry.meters);
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealer(name: &str) -> CarDealer {
        CarDealer {
            brand: "Aria".to_string(),
            dealer_name: name.to_string(),
            address: "Bengaluru".to_string(),
        }
    }

    #[test]
    fn category_boundary_sits_at_one_crore() {
        assert_eq!(dealer_category(0), "Standard");
        assert_eq!(dealer_category(999_999_999), "Standard");
        assert_eq!(dealer_category(1_000_000_000), "Premium");
    }

    #[test]
    fn nearest_sorts_ascending_and_truncates() {
        let ranked = nearest(
            vec![
                DealerDistance { dealer: dealer("far"), meters: 9_000 },
                DealerDistance { dealer: dealer("near"), meters: 800 },
                DealerDistance { dealer: dealer("mid"), meters: 4_200 },
            ],
            2,
        );

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].dealer.dealer_name, "near");
        assert_eq!(ranked[1].dealer.dealer_name, "mid");
    }

    #[test]
    fn nearest_keeps_everything_under_the_limit() {
        let ranked = nearest(
            vec![DealerDistance { dealer: dealer("only"), meters: 500 }],
            NEAREST_DEALER_COUNT,
        );
        assert_eq!(ranked.len(), 1);
    }
}
