//! User lookup and creation.

use tracing::{error, info, instrument, warn};

use crate::{
    models::{NewUser, User},
    query::QueryFragment,
    store::{fetch_one, fetch_optional},
    DbError, Store,
};

/// Unique index on `LOWER(users.email)`.
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_lower_key";

/// Fetch a user by email, ignoring case. `None` if nobody has that address.
#[instrument(skip(store))]
pub async fn get_user_with_email<S>(store: &S, email: &str) -> Result<Option<User>, DbError>
where
    S: Store + ?Sized,
{
    let mut query = QueryFragment::new("SELECT * FROM users\nWHERE LOWER(users.email) = LOWER(");
    let n = query.bind(email);
    query.push(&format!("${n})"));

    fetch_optional(store, &query).await.map_err(|e| {
        error!(error = %e, "failed to look up user by email");
        e
    })
}

/// Fetch a user by primary key. `None` if the id is unknown.
#[instrument(skip(store))]
pub async fn get_user_with_id<S>(store: &S, id: i32) -> Result<Option<User>, DbError>
where
    S: Store + ?Sized,
{
    let mut query = QueryFragment::new("SELECT * FROM users\nWHERE users.id = ");
    let n = query.bind(id);
    query.push(&format!("${n}"));

    fetch_optional(store, &query).await.map_err(|e| {
        error!(error = %e, "failed to look up user by id");
        e
    })
}

/// Insert a new user and return the stored row.
///
/// Email uniqueness (case-insensitive) is enforced by the database in the same
/// statement, so two concurrent sign-ups for one address cannot both succeed.
/// A violation surfaces as [`DbError::DuplicateEmail`].
#[instrument(skip(store, user), fields(email = %user.email))]
pub async fn add_user<S>(store: &S, user: &NewUser) -> Result<User, DbError>
where
    S: Store + ?Sized,
{
    let mut query = QueryFragment::new("INSERT INTO users (name, email, password)\nVALUES (");
    let name = query.bind(user.name.as_str());
    let email = query.bind(user.email.as_str());
    let password = query.bind(user.password.as_str());
    query.push(&format!("${name}, ${email}, ${password})\nRETURNING *"));

    match fetch_one::<User, _>(store, &query).await {
        Ok(created) => {
            info!(user_id = created.id, "user created");
            Ok(created)
        }
        Err(DbError::UniqueViolation { constraint })
            if constraint.as_deref().map_or(true, |c| c == EMAIL_UNIQUE_CONSTRAINT) =>
        {
            warn!("email is already in use");
            Err(DbError::DuplicateEmail(user.email.clone()))
        }
        Err(e) => {
            error!(error = %e, "failed to create user");
            Err(e)
        }
    }
}
