use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};
use validator::Validate;

use crate::booking::SeatStatus;
use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Show {
    pub show_id: i32,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    pub hall_id: i32,
    pub movie_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShowFields {
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
    #[validate(range(min = 1))]
    pub hall_id: i32,
    #[validate(range(min = 1))]
    pub movie_id: i32,
}

/// Movie facts shown above the show time picker.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShowMovieInfo {
    pub movie_id: i32,
    pub title: String,
    pub genre: String,
    pub age_limit: String,
    pub language: String,
}

/// Distinct (hall, date) pairs a movie is screened in.
#[derive(Debug, Clone, FromRow)]
pub struct HallSchedule {
    pub hall_id: i32,
    pub hall_name: String,
    pub hall_type: String,
    pub show_date: NaiveDate,
}

#[derive(Debug, Clone, FromRow)]
pub struct StartTime {
    pub show_id: i32,
    pub start_time: NaiveTime,
}

/// Seat map entry for one show.
#[derive(Debug, Clone, FromRow)]
pub struct SeatMapRow {
    pub seat_row: String,
    pub seat_number: i32,
    pub seat_type: String,
    pub show_seat_id: i32,
    pub status: String,
    pub price: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct ShowHeader {
    pub title: String,
    pub show_id: i32,
    pub show_date: NaiveDate,
    pub start_time: NaiveTime,
}

/// A `show_seat` row as seen by administrators. `price` is in cents.
#[derive(Debug, Clone, FromRow)]
pub struct ShowSeat {
    pub show_seat_id: i32,
    pub cinema_seat_id: i32,
    pub status: String,
    pub price: i32,
    pub show_id: i32,
}

/// Outcome of [`Show::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowUpdate {
    /// `reseeded` holds the number of seats opened when the hall changed.
    Updated { reseeded: Option<u64> },
    NotFound,
    InUse,
}

/// A show is frozen once it has bookings or any seat has left `Available`.
fn in_use(seat_statuses: &[String], has_bookings: bool) -> bool {
    has_bookings
        || seat_statuses
            .iter()
            .any(|status| status != SeatStatus::Available.as_str())
}

/// Opens one available seat per seat of `hall_id` for the show.
async fn open_show_seats(
    conn: &mut PgConnection,
    show_id: i32,
    hall_id: i32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO show_seat (cinema_seat_id, status, price, show_id)
        SELECT cinema_seat_id, $1, 0, $2
        FROM cinema_seat
        WHERE hall_id = $3
        "#,
    )
    .bind(SeatStatus::Available.as_str())
    .bind(show_id)
    .bind(hall_id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

impl Show {
    pub async fn all(db: &Database) -> Result<Vec<Show>, sqlx::Error> {
        sqlx::query_as::<_, Show>(
            "SELECT show_id, show_date, start_time, hall_id, movie_id FROM show ORDER BY show_date, start_time",
        )
        .fetch_all(&db.pool)
        .await
    }

    /// Creates the show and one available seat per seat of its hall.
    /// Returns the show id and the number of seats opened.
    pub async fn insert_with_seats(
        fields: &ShowFields,
        db: &Database,
    ) -> Result<(i32, u64), sqlx::Error> {
        let mut tx = db.pool.begin().await?;

        let show_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO show (show_date, start_time, hall_id, movie_id)
            VALUES ($1, $2, $3, $4)
            RETURNING show_id
            "#,
        )
        .bind(fields.show_date)
        .bind(fields.start_time)
        .bind(fields.hall_id)
        .bind(fields.movie_id)
        .fetch_one(&mut *tx)
        .await?;

        let seats = open_show_seats(&mut *tx, show_id, fields.hall_id).await?;

        tx.commit().await?;
        Ok((show_id, seats))
    }

    /// Rewrites the show unless a booking or a claimed seat refers to it.
    /// Moving the show to another hall replaces its seats with the new
    /// hall's, in the same transaction.
    pub async fn update(
        id: i32,
        fields: &ShowFields,
        db: &Database,
    ) -> Result<ShowUpdate, sqlx::Error> {
        let mut tx = db.pool.begin().await?;

        let current_hall =
            sqlx::query_scalar::<_, i32>("SELECT hall_id FROM show WHERE show_id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(current_hall) = current_hall else {
            return Ok(ShowUpdate::NotFound);
        };

        // locks the seats so a concurrent claim waits for this transaction
        let statuses = sqlx::query_scalar::<_, String>(
            "SELECT status FROM show_seat WHERE show_id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;
        let has_bookings = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM booking WHERE show_id = $1)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if in_use(&statuses, has_bookings) {
            return Ok(ShowUpdate::InUse);
        }

        sqlx::query(
            "UPDATE show SET show_date = $1, start_time = $2, hall_id = $3, movie_id = $4 WHERE show_id = $5",
        )
        .bind(fields.show_date)
        .bind(fields.start_time)
        .bind(fields.hall_id)
        .bind(fields.movie_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let reseeded = if current_hall != fields.hall_id {
            sqlx::query("DELETE FROM show_seat WHERE show_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Some(open_show_seats(&mut *tx, id, fields.hall_id).await?)
        } else {
            None
        };

        tx.commit().await?;
        Ok(ShowUpdate::Updated { reseeded })
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM show WHERE show_id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl ShowMovieInfo {
    pub async fn for_show(
        show_id: i32,
        db: &Database,
    ) -> Result<Option<ShowMovieInfo>, sqlx::Error> {
        sqlx::query_as::<_, ShowMovieInfo>(
            r#"
            SELECT m.id AS movie_id, m.title, m.genre, m.age_limit, m.language
            FROM movies m
            JOIN show s ON s.movie_id = m.id
            WHERE s.show_id = $1
            "#,
        )
        .bind(show_id)
        .fetch_optional(&db.pool)
        .await
    }
}

impl HallSchedule {
    pub async fn for_movie(movie_id: i32, db: &Database) -> Result<Vec<HallSchedule>, sqlx::Error> {
        sqlx::query_as::<_, HallSchedule>(
            r#"
            SELECT DISTINCT ch.cinema_hall_id AS hall_id, ch.hall_name, ch.hall_type, s.show_date
            FROM cinema_hall ch
            JOIN show s ON s.hall_id = ch.cinema_hall_id
            WHERE s.movie_id = $1
            ORDER BY s.show_date, ch.hall_name
            "#,
        )
        .bind(movie_id)
        .fetch_all(&db.pool)
        .await
    }
}

impl StartTime {
    pub async fn for_schedule(
        movie_id: i32,
        schedule: &HallSchedule,
        db: &Database,
    ) -> Result<Vec<StartTime>, sqlx::Error> {
        sqlx::query_as::<_, StartTime>(
            r#"
            SELECT show_id, start_time
            FROM show
            WHERE movie_id = $1 AND hall_id = $2 AND show_date = $3
            ORDER BY start_time
            "#,
        )
        .bind(movie_id)
        .bind(schedule.hall_id)
        .bind(schedule.show_date)
        .fetch_all(&db.pool)
        .await
    }
}

impl SeatMapRow {
    pub async fn for_show(show_id: i32, db: &Database) -> Result<Vec<SeatMapRow>, sqlx::Error> {
        sqlx::query_as::<_, SeatMapRow>(
            r#"
            SELECT cs.seat_row, cs.seat_number, cs.seat_type, ss.show_seat_id, ss.status, ss.price
            FROM cinema_seat cs
            JOIN show_seat ss ON ss.cinema_seat_id = cs.cinema_seat_id
            WHERE ss.show_id = $1
            ORDER BY cs.seat_row, cs.seat_number
            "#,
        )
        .bind(show_id)
        .fetch_all(&db.pool)
        .await
    }
}

impl ShowHeader {
    pub async fn find(show_id: i32, db: &Database) -> Result<Option<ShowHeader>, sqlx::Error> {
        sqlx::query_as::<_, ShowHeader>(
            r#"
            SELECT m.title, s.show_id, s.show_date, s.start_time
            FROM show s
            JOIN movies m ON m.id = s.movie_id
            WHERE s.show_id = $1
            "#,
        )
        .bind(show_id)
        .fetch_optional(&db.pool)
        .await
    }
}

impl ShowSeat {
    pub async fn for_show(show_id: i32, db: &Database) -> Result<Vec<ShowSeat>, sqlx::Error> {
        sqlx::query_as::<_, ShowSeat>(
            r#"
            SELECT show_seat_id, cinema_seat_id, status, price, show_id
            FROM show_seat
            WHERE show_id = $1
            ORDER BY show_seat_id
            "#,
        )
        .bind(show_id)
        .fetch_all(&db.pool)
        .await
    }

    pub async fn update_price(
        show_seat_id: i32,
        price_cents: i32,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE show_seat SET price = $1 WHERE show_seat_id = $2")
            .bind(price_cents)
            .bind(show_seat_id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
