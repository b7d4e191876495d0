//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models. Rows arrive from the [`crate::Store`] as
//! JSON objects keyed by column name and are decoded with serde, so every
//! field name here is the column name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

/// A persisted user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored credential as supplied by the caller. Never serialised outward.
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// Fields required to create a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// reservations
// ---------------------------------------------------------------------------

/// A guest's reservation joined with a summary of the reserved property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i32,
    pub guest_id: i32,
    pub property_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub title: String,
    pub thumbnail_photo_url: Option<String>,
    /// Minor currency units.
    pub cost_per_night: i64,
    pub number_of_bedrooms: i32,
    pub number_of_bathrooms: i32,
    pub parking_spaces: i32,
    pub average_rating: Option<f64>,
}

// ---------------------------------------------------------------------------
// properties
// ---------------------------------------------------------------------------

/// A persisted property row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: Option<String>,
    pub cover_photo_url: Option<String>,
    /// Minor currency units (cents).
    pub cost_per_night: i64,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

/// A property search hit: the property plus its average review rating.
///
/// `average_rating` is `None` for properties nobody has reviewed yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

/// Fields required to list a new property.
///
/// `cost_per_night` is in major currency units here; the repository converts
/// it before it reaches the table.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: Option<String>,
    pub cover_photo_url: Option<String>,
    pub cost_per_night: f64,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
}
