//! Repository tests against a live Postgres.
//!
//! Enable with `--features integration`; `DATABASE_URL` must point at a
//! server where the test user may create databases. Each test gets a fresh
//! database with `migrations/` applied.

#![cfg(feature = "integration")]

use db::models::{NewProperty, NewUser};
use db::repository::{properties, reservations, users};
use db::{DbError, PgStore, PropertyFilters};
use sqlx::PgPool;

async fn seed(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO users (name, email, password) VALUES
            ('Eva Stanley', 'sebastianguerra@ymail.com', 'pw'),
            ('Louisa Meyer', 'jacksonrose@hotmail.com', 'pw')",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO properties (owner_id, title, cost_per_night, country, street, city, province, post_code) VALUES
            (1, 'Speed lamp', 9300, 'Canada', '536 Namsub Highway', 'Vancouver', 'BC', '28142'),
            (1, 'Blank corner', 8500, 'Canada', '651 Nami Road', 'North Vancouver', 'BC', '81059'),
            (2, 'Habit mix', 46000, 'Canada', '1650 Hejto Center', 'Calgary', 'AB', '44583')",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id) VALUES
            ('2019-01-04', '2019-02-01', 2, 2),
            ('2018-09-11', '2018-09-26', 1, 2),
            ('2023-10-01', '2023-10-14', 3, 1)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO property_reviews (guest_id, property_id, reservation_id, rating) VALUES
            (2, 1, 2, 5),
            (2, 2, 1, 3)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn email_lookup_is_case_insensitive(pool: PgPool) -> Result<(), DbError> {
    seed(&pool).await?;
    let store = PgStore::new(pool);

    let user = users::get_user_with_email(&store, "SebastianGuerra@YMAIL.com")
        .await?
        .expect("user should match regardless of case");
    assert_eq!(user.id, 1);

    assert!(users::get_user_with_email(&store, "nobody@example.com").await?.is_none());
    assert_eq!(users::get_user_with_id(&store, 2).await?.map(|u| u.name), Some("Louisa Meyer".into()));
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_email_is_rejected_without_a_second_row(pool: PgPool) -> Result<(), DbError> {
    seed(&pool).await?;
    let store = PgStore::new(pool.clone());

    let err = users::add_user(
        &store,
        &NewUser {
            name: "Impostor".into(),
            email: "SEBASTIANGUERRA@ymail.com".into(),
            password: "pw".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DbError::DuplicateEmail(_)), "{err}");

    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM users WHERE LOWER(email) = 'sebastianguerra@ymail.com'")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);

    let created = users::add_user(
        &store,
        &NewUser { name: "New".into(), email: "new@example.com".into(), password: "pw".into() },
    )
    .await?;
    assert_eq!(created.email, "new@example.com");
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn reservations_come_back_in_start_date_order(pool: PgPool) -> Result<(), DbError> {
    seed(&pool).await?;
    let store = PgStore::new(pool);

    let rows = reservations::get_all_reservations(&store, 2, 10).await?;
    let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Speed lamp", "Blank corner"]);
    assert_eq!(rows[0].average_rating, Some(5.0));

    let limited = reservations::get_all_reservations(&store, 2, 1).await?;
    assert_eq!(limited.len(), 1);

    assert!(reservations::get_all_reservations(&store, 99, 10).await?.is_empty());
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_applies_filters_and_orders_by_price(pool: PgPool) -> Result<(), DbError> {
    seed(&pool).await?;
    let store = PgStore::new(pool);

    let all = properties::get_all_properties(&store, &PropertyFilters::default(), 10).await?;
    let costs: Vec<_> = all.iter().map(|p| p.property.cost_per_night).collect();
    assert_eq!(costs, [8500, 9300, 46000]);
    assert_eq!(all[2].average_rating, None);

    let van = PropertyFilters { city: Some("van".into()), ..Default::default() };
    assert_eq!(properties::get_all_properties(&store, &van, 10).await?.len(), 2);

    let rated = PropertyFilters {
        city: Some("Van".into()),
        minimum_rating: Some(4.0),
        ..Default::default()
    };
    let hits = properties::get_all_properties(&store, &rated, 5).await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].property.title, "Speed lamp");

    let priced = PropertyFilters {
        minimum_price_per_night: Some(90.0),
        maximum_price_per_night: Some(100.0),
        ..Default::default()
    };
    let hits = properties::get_all_properties(&store, &priced, 10).await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].property.cost_per_night, 9300);

    let owned = PropertyFilters { owner_id: Some(2), ..Default::default() };
    assert_eq!(properties::get_all_properties(&store, &owned, 10).await?.len(), 1);
    Ok(())
}

#[sqlx::test(migrations = "../../migrations")]
async fn added_property_stores_cents(pool: PgPool) -> Result<(), DbError> {
    seed(&pool).await?;
    let store = PgStore::new(pool);

    let created = properties::add_property(
        &store,
        &NewProperty {
            owner_id: 1,
            title: "Port out".into(),
            description: None,
            thumbnail_photo_url: None,
            cover_photo_url: None,
            cost_per_night: 150.5,
            parking_spaces: 1,
            number_of_bathrooms: 1,
            number_of_bedrooms: 2,
            country: "Canada".into(),
            street: "1 Main St".into(),
            city: "Victoria".into(),
            province: "BC".into(),
            post_code: "V8V".into(),
        },
    )
    .await?;

    assert_eq!(created.cost_per_night, 15050);
    assert!(created.id > 3);
    assert!(created.active);
    assert_eq!(created.description, None);
    Ok(())
}
