//! Parameterised SQL fragments and the property-search query builder.
//!
//! Every statement the repository issues is a [`QueryFragment`]: SQL text with
//! `$N` placeholders plus the ordered list of values bound to them. The Nth
//! placeholder always refers to the Nth parameter.

use serde::{Deserialize, Serialize};

use crate::DbError;

/// Row cap used when a caller has no opinion.
pub const DEFAULT_LIMIT: u32 = 10;

/// Convert a price in major currency units to minor units (cents).
pub fn to_minor_units(major: f64) -> i64 {
    (major * 100.0).round() as i64
}

// ---------------------------------------------------------------------------
// SqlParam
// ---------------------------------------------------------------------------

/// A single bound value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for SqlParam {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for SqlParam {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

// ---------------------------------------------------------------------------
// QueryFragment
// ---------------------------------------------------------------------------

/// SQL text paired with its positional parameters.
///
/// Only this crate can extend a fragment; callers receive it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFragment {
    sql: String,
    params: Vec<SqlParam>,
}

impl QueryFragment {
    pub(crate) fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append a bound value and return its 1-based placeholder position.
    pub(crate) fn bind(&mut self, value: impl Into<SqlParam>) -> usize {
        self.params.push(value.into());
        self.params.len()
    }

    pub(crate) fn push(&mut self, text: &str) -> &mut Self {
        self.sql.push_str(text);
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }
}

// ---------------------------------------------------------------------------
// Property search
// ---------------------------------------------------------------------------

/// Optional constraints for a property search. `None` means unconstrained.
///
/// Prices are in major currency units.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilters {
    pub city: Option<String>,
    pub owner_id: Option<i32>,
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
    pub minimum_rating: Option<f64>,
}

impl PropertyFilters {
    fn validate(&self) -> Result<(), DbError> {
        if let Some(owner_id) = self.owner_id {
            if owner_id < 0 {
                return Err(DbError::InvalidInput(format!("ownerId must be non-negative, got {owner_id}")));
            }
        }
        let numeric = [
            ("minimumPricePerNight", self.minimum_price_per_night),
            ("maximumPricePerNight", self.maximum_price_per_night),
            ("minimumRating", self.minimum_rating),
        ];
        for (name, value) in numeric {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(DbError::InvalidInput(format!("{name} must be a non-negative number, got {v}")));
                }
            }
        }
        Ok(())
    }
}

const PROPERTY_SEARCH_BASE: &str = "SELECT properties.*, avg(property_reviews.rating) AS average_rating
FROM properties
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
WHERE TRUE";

/// Build the property search query for `filters`, capped at `limit` rows.
///
/// Filters are applied in a fixed order (city, owner, minimum price, maximum
/// price) before grouping; the rating filter runs after aggregation in a
/// `HAVING` clause. `limit` is always the last parameter.
pub fn property_search(filters: &PropertyFilters, limit: u32) -> Result<QueryFragment, DbError> {
    if limit == 0 {
        return Err(DbError::InvalidInput("limit must be greater than zero".into()));
    }
    filters.validate()?;

    let mut query = QueryFragment::new(PROPERTY_SEARCH_BASE);

    if let Some(city) = &filters.city {
        let n = query.bind(format!("%{}%", escape_like(city)));
        query.push(&format!("\nAND properties.city ILIKE ${n}"));
    }

    if let Some(owner_id) = filters.owner_id {
        let n = query.bind(owner_id);
        query.push(&format!("\nAND properties.owner_id = ${n}"));
    }

    if let Some(min) = filters.minimum_price_per_night {
        let n = query.bind(to_minor_units(min));
        query.push(&format!("\nAND properties.cost_per_night >= ${n}"));
    }

    if let Some(max) = filters.maximum_price_per_night {
        let n = query.bind(to_minor_units(max));
        query.push(&format!("\nAND properties.cost_per_night <= ${n}"));
    }

    query.push("\nGROUP BY properties.id");

    if let Some(rating) = filters.minimum_rating {
        let n = query.bind(rating);
        query.push(&format!("\nHAVING avg(property_reviews.rating) >= ${n}"));
    }

    let n = query.bind(limit);
    query.push(&format!("\nORDER BY properties.cost_per_night\nLIMIT ${n}"));

    Ok(query)
}

/// Escape LIKE metacharacters so user input only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
