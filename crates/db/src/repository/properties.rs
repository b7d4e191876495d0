//! Property search and insertion.

use tracing::{error, info, instrument};

use crate::{
    models::{NewProperty, Property, PropertyListing},
    query::{property_search, to_minor_units, PropertyFilters, QueryFragment},
    store::{fetch_all, fetch_one},
    DbError, Store,
};

/// Search properties matching `filters`, cheapest first, capped at `limit`.
///
/// Store failures are logged and returned; nothing is swallowed.
#[instrument(skip(store))]
pub async fn get_all_properties<S>(
    store: &S,
    filters: &PropertyFilters,
    limit: u32,
) -> Result<Vec<PropertyListing>, DbError>
where
    S: Store + ?Sized,
{
    let query = property_search(filters, limit)?;

    fetch_all(store, &query).await.map_err(|e| {
        error!(error = %e, "property search failed");
        e
    })
}

/// Insert a property and return the stored row, including its generated id.
///
/// `property.cost_per_night` is in major units and is stored in minor units.
#[instrument(skip(store, property), fields(owner_id = property.owner_id, title = %property.title))]
pub async fn add_property<S>(store: &S, property: &NewProperty) -> Result<Property, DbError>
where
    S: Store + ?Sized,
{
    validate(property)?;

    let mut query = QueryFragment::new(
        "INSERT INTO properties (
    owner_id, title, description, thumbnail_photo_url, cover_photo_url,
    cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
    country, street, city, province, post_code
)
VALUES (",
    );
    let placeholders = [
        query.bind(property.owner_id),
        query.bind(property.title.as_str()),
        bind_optional(&mut query, property.description.as_deref()),
        bind_optional(&mut query, property.thumbnail_photo_url.as_deref()),
        bind_optional(&mut query, property.cover_photo_url.as_deref()),
        query.bind(to_minor_units(property.cost_per_night)),
        query.bind(property.parking_spaces),
        query.bind(property.number_of_bathrooms),
        query.bind(property.number_of_bedrooms),
        query.bind(property.country.as_str()),
        query.bind(property.street.as_str()),
        query.bind(property.city.as_str()),
        query.bind(property.province.as_str()),
        query.bind(property.post_code.as_str()),
    ];
    let values: Vec<String> = placeholders
        .iter()
        .map(|p| if *p == 0 { "NULL".to_string() } else { format!("${p}") })
        .collect();
    query.push(&values.join(", ")).push(")\nRETURNING *");

    match fetch_one::<Property, _>(store, &query).await {
        Ok(created) => {
            info!(property_id = created.id, "property created");
            Ok(created)
        }
        Err(e) => {
            error!(error = %e, "failed to create property");
            Err(e)
        }
    }
}

/// Bind `value` if present. Returns 0 (no placeholder) for `None`.
fn bind_optional(query: &mut QueryFragment, value: Option<&str>) -> usize {
    value.map_or(0, |v| query.bind(v))
}

fn validate(property: &NewProperty) -> Result<(), DbError> {
    if !property.cost_per_night.is_finite() || property.cost_per_night < 0.0 {
        return Err(DbError::InvalidInput(format!(
            "cost_per_night must be a non-negative number, got {}",
            property.cost_per_night
        )));
    }
    let counts = [
        ("parking_spaces", property.parking_spaces),
        ("number_of_bathrooms", property.number_of_bathrooms),
        ("number_of_bedrooms", property.number_of_bedrooms),
    ];
    for (name, value) in counts {
        if value < 0 {
            return Err(DbError::InvalidInput(format!("{name} must be non-negative, got {value}")));
        }
    }
    Ok(())
}
