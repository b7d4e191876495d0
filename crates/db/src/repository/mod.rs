//! Repository functions: one function per database operation.
//!
//! Every function takes the store handle explicitly (`&S where S: Store`) and
//! returns a `Result<T, DbError>`. No business logic beyond shaping the SQL.

pub mod users;
pub mod reservations;
pub mod properties;
