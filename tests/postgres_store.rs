//! Database-backed checks for the seat store and the admin rules that guard
//! booked seats. Each test gets a fresh database from `DATABASE_URL`.

use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

use cinema_tickets::booking::postgres::PgSeatStore;
use cinema_tickets::booking::{SeatStatus, SeatStatusStore, StoreError};
use cinema_tickets::database::Database;
use cinema_tickets::models::hall::{SeatFields, SeatInsert};
use cinema_tickets::models::show::{ShowFields, ShowUpdate};
use cinema_tickets::models::{CinemaSeat, Show};
use cinema_tickets::services::admin;

struct Seeded {
    movie_id: i32,
    hall_id: i32,
    cinema_seat_id: i32,
    show_id: i32,
    show_seat_id: i32,
}

async fn hall(pool: &PgPool, name: &str, capacity: i32) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO cinema_hall (hall_name, hall_type, capacity) VALUES ($1, '2D', $2) RETURNING cinema_hall_id",
    )
    .bind(name)
    .bind(capacity)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seat(pool: &PgPool, hall_id: i32, number: i32) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO cinema_seat (seat_row, seat_number, seat_type, hall_id) VALUES ('A', $1, 'Standard', $2) RETURNING cinema_seat_id",
    )
    .bind(number)
    .bind(hall_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// One movie, one hall with one seat, and a show that opened that seat.
async fn seed(pool: &PgPool) -> Seeded {
    let movie_id: i32 =
        sqlx::query_scalar("INSERT INTO movies (title) VALUES ('Arrival') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let hall_id = hall(pool, "Red", 10).await;
    let cinema_seat_id = seat(pool, hall_id, 1).await;

    let show_id: i32 = sqlx::query_scalar(
        "INSERT INTO show (show_date, start_time, hall_id, movie_id) VALUES ('2024-05-01', '18:30', $1, $2) RETURNING show_id",
    )
    .bind(hall_id)
    .bind(movie_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let show_seat_id: i32 = sqlx::query_scalar(
        "INSERT INTO show_seat (cinema_seat_id, status, price, show_id) VALUES ($1, 'Available', 1000, $2) RETURNING show_seat_id",
    )
    .bind(cinema_seat_id)
    .bind(show_id)
    .fetch_one(pool)
    .await
    .unwrap();

    Seeded {
        movie_id,
        hall_id,
        cinema_seat_id,
        show_id,
        show_seat_id,
    }
}

async fn book(pool: &PgPool, seeded: &Seeded) {
    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (name, surname, email, phone_number, password_hash) VALUES ('Ada', 'King', 'ada@example.com', '+100', 'x') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query("UPDATE show_seat SET status = 'Booked' WHERE show_seat_id = $1")
        .bind(seeded.show_seat_id)
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO booking (number_of_seats, status, user_id, show_id) VALUES (1, 'Pending', $1, $2)")
        .bind(user_id)
        .bind(seeded.show_id)
        .execute(pool)
        .await
        .unwrap();
}

async fn show_seat_count(pool: &PgPool, show_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM show_seat WHERE show_id = $1")
        .bind(show_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn show_fields(seeded: &Seeded, hall_id: i32) -> ShowFields {
    ShowFields {
        show_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        start_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        hall_id,
        movie_id: seeded.movie_id,
    }
}

#[sqlx::test(migrations = "./src/migrations")]
async fn concurrent_transitions_on_one_seat_have_one_winner(pool: PgPool) {
    let seeded = seed(&pool).await;
    let store = PgSeatStore::new(Database { pool });
    let (show, seat) = (seeded.show_id, seeded.show_seat_id);

    let (first, second) = tokio::join!(
        store.transition_seat_status(show, seat, SeatStatus::Available, SeatStatus::Selected),
        store.transition_seat_status(show, seat, SeatStatus::Available, SeatStatus::Selected),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(StoreError::StatusChanged { expected: SeatStatus::Available, .. })
    )));
    assert_eq!(store.seat_status(show, seat).await.unwrap(), SeatStatus::Selected);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn failed_transition_tells_missing_from_changed(pool: PgPool) {
    let seeded = seed(&pool).await;
    let store = PgSeatStore::new(Database { pool });
    let (show, seat) = (seeded.show_id, seeded.show_seat_id);

    let changed = store
        .transition_seat_status(show, seat, SeatStatus::Selected, SeatStatus::Booked)
        .await;
    assert!(matches!(changed, Err(StoreError::StatusChanged { .. })));
    assert_eq!(store.seat_status(show, seat).await.unwrap(), SeatStatus::Available);

    let missing = store
        .transition_seat_status(show + 1, seat, SeatStatus::Available, SeatStatus::Selected)
        .await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}

#[sqlx::test(migrations = "./src/migrations")]
async fn hall_seat_used_by_a_show_cannot_be_deleted(pool: PgPool) {
    let seeded = seed(&pool).await;
    book(&pool, &seeded).await;
    let db = Database { pool: pool.clone() };

    let err = admin::delete_seat(&db, seeded.cinema_seat_id).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::CONFLICT);
    assert_eq!(err.to_string(), "seat is used by scheduled shows");

    let booked: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM show_seat WHERE status = 'Booked'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(booked, 1);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn unused_hall_seat_can_be_deleted(pool: PgPool) {
    let seeded = seed(&pool).await;
    let spare = seat(&pool, seeded.hall_id, 2).await;
    let db = Database { pool };

    admin::delete_seat(&db, spare).await.unwrap();
    let err = admin::delete_seat(&db, spare).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn booked_show_cannot_be_edited(pool: PgPool) {
    let seeded = seed(&pool).await;
    book(&pool, &seeded).await;
    let other_hall = hall(&pool, "Blue", 10).await;
    seat(&pool, other_hall, 1).await;
    let db = Database { pool: pool.clone() };

    let outcome = Show::update(seeded.show_id, &show_fields(&seeded, other_hall), &db)
        .await
        .unwrap();
    assert_eq!(outcome, ShowUpdate::InUse);

    let hall_id: i32 = sqlx::query_scalar("SELECT hall_id FROM show WHERE show_id = $1")
        .bind(seeded.show_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(hall_id, seeded.hall_id);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn claimed_seat_freezes_the_show(pool: PgPool) {
    let seeded = seed(&pool).await;
    sqlx::query("UPDATE show_seat SET status = 'Selected' WHERE show_seat_id = $1")
        .bind(seeded.show_seat_id)
        .execute(&pool)
        .await
        .unwrap();
    let db = Database { pool };

    let outcome = Show::update(seeded.show_id, &show_fields(&seeded, seeded.hall_id), &db)
        .await
        .unwrap();
    assert_eq!(outcome, ShowUpdate::InUse);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn moving_an_unbooked_show_reopens_the_new_halls_seats(pool: PgPool) {
    let seeded = seed(&pool).await;
    let other_hall = hall(&pool, "Blue", 10).await;
    for number in 1..=3 {
        seat(&pool, other_hall, number).await;
    }
    let db = Database { pool: pool.clone() };

    let outcome = Show::update(seeded.show_id, &show_fields(&seeded, other_hall), &db)
        .await
        .unwrap();
    assert_eq!(outcome, ShowUpdate::Updated { reseeded: Some(3) });
    assert_eq!(show_seat_count(&pool, seeded.show_id).await, 3);

    let foreign: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM show_seat ss
        JOIN cinema_seat cs ON cs.cinema_seat_id = ss.cinema_seat_id
        WHERE ss.show_id = $1 AND cs.hall_id <> $2
        "#,
    )
    .bind(seeded.show_id)
    .bind(other_hall)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(foreign, 0);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn same_hall_edit_keeps_seats(pool: PgPool) {
    let seeded = seed(&pool).await;
    let db = Database { pool: pool.clone() };

    let outcome = Show::update(seeded.show_id, &show_fields(&seeded, seeded.hall_id), &db)
        .await
        .unwrap();
    assert_eq!(outcome, ShowUpdate::Updated { reseeded: None });
    assert_eq!(show_seat_count(&pool, seeded.show_id).await, 1);

    let missing = Show::update(seeded.show_id + 100, &show_fields(&seeded, seeded.hall_id), &db)
        .await
        .unwrap();
    assert_eq!(missing, ShowUpdate::NotFound);
}

#[sqlx::test(migrations = "./src/migrations")]
async fn concurrent_seat_creation_respects_capacity(pool: PgPool) {
    let hall_id = hall(&pool, "Tiny", 1).await;
    let db = Database { pool: pool.clone() };
    let fields = |number| SeatFields {
        seat_row: "A".to_string(),
        seat_number: number,
        seat_type: "Standard".to_string(),
        hall_id,
    };
    let (first, second) = (fields(1), fields(2));

    let (a, b) = tokio::join!(
        CinemaSeat::insert_within_capacity(&first, &db),
        CinemaSeat::insert_within_capacity(&second, &db),
    );
    let outcomes = [a.unwrap(), b.unwrap()];

    assert_eq!(
        outcomes.iter().filter(|o| matches!(o, SeatInsert::Inserted(_))).count(),
        1
    );
    assert!(outcomes.iter().any(|o| matches!(o, SeatInsert::HallFull(_))));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cinema_seat WHERE hall_id = $1")
        .bind(hall_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let err = admin::create_seat(&db, &fields(3)).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}
