//! Reservation listing.

use tracing::{error, instrument};

use crate::{
    models::Reservation,
    query::QueryFragment,
    store::fetch_all,
    DbError, Store,
};

const GUEST_RESERVATIONS: &str = "SELECT reservations.*,
    properties.title,
    properties.thumbnail_photo_url,
    properties.cost_per_night,
    properties.number_of_bedrooms,
    properties.number_of_bathrooms,
    properties.parking_spaces,
    avg(property_reviews.rating) AS average_rating
FROM reservations
JOIN properties ON reservations.property_id = properties.id
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
WHERE reservations.guest_id = ";

/// All reservations made by `guest_id`, earliest start date first, capped at
/// `limit`. A guest with no reservations gets an empty list.
#[instrument(skip(store))]
pub async fn get_all_reservations<S>(
    store: &S,
    guest_id: i32,
    limit: u32,
) -> Result<Vec<Reservation>, DbError>
where
    S: Store + ?Sized,
{
    if limit == 0 {
        return Err(DbError::InvalidInput("limit must be greater than zero".into()));
    }

    let mut query = QueryFragment::new(GUEST_RESERVATIONS);
    let guest = query.bind(guest_id);
    query.push(&format!("${guest}\nGROUP BY properties.id, reservations.id\nORDER BY reservations.start_date"));
    let n = query.bind(limit);
    query.push(&format!("\nLIMIT ${n}"));

    fetch_all(store, &query).await.map_err(|e| {
        error!(error = %e, "failed to list reservations");
        e
    })
}
