use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::database::Database;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CinemaHall {
    pub cinema_hall_id: i32,
    pub hall_name: String,
    pub hall_type: String,
    pub capacity: i32,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CinemaSeat {
    pub cinema_seat_id: i32,
    pub seat_row: String,
    pub seat_number: i32,
    pub seat_type: String,
    pub hall_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HallFields {
    #[validate(length(min = 1, max = 100))]
    pub hall_name: String,
    #[validate(length(min = 1, max = 50))]
    pub hall_type: String,
    #[validate(range(min = 1, max = 1000))]
    pub capacity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SeatFields {
    #[validate(length(min = 1, max = 5))]
    pub seat_row: String,
    #[validate(range(min = 1))]
    pub seat_number: i32,
    #[validate(length(min = 1, max = 50))]
    pub seat_type: String,
    #[validate(range(min = 1))]
    pub hall_id: i32,
}

/// Outcome of [`CinemaSeat::insert_within_capacity`].
#[derive(Debug)]
pub enum SeatInsert {
    Inserted(i32),
    HallNotFound,
    HallFull(CinemaHall),
}

impl CinemaHall {
    /// A hall holds at most `capacity` seats.
    pub fn has_room(&self, existing_seats: i64) -> bool {
        existing_seats < i64::from(self.capacity)
    }

    pub async fn all(db: &Database) -> Result<Vec<CinemaHall>, sqlx::Error> {
        sqlx::query_as::<_, CinemaHall>(
            "SELECT cinema_hall_id, hall_name, hall_type, capacity FROM cinema_hall ORDER BY cinema_hall_id",
        )
        .fetch_all(&db.pool)
        .await
    }

    pub async fn find(id: i32, db: &Database) -> Result<Option<CinemaHall>, sqlx::Error> {
        sqlx::query_as::<_, CinemaHall>(
            "SELECT cinema_hall_id, hall_name, hall_type, capacity FROM cinema_hall WHERE cinema_hall_id = $1",
        )
        .bind(id)
        .fetch_optional(&db.pool)
        .await
    }

    pub async fn insert(fields: &HallFields, db: &Database) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO cinema_hall (hall_name, hall_type, capacity) VALUES ($1, $2, $3) RETURNING cinema_hall_id",
        )
        .bind(&fields.hall_name)
        .bind(&fields.hall_type)
        .bind(fields.capacity)
        .fetch_one(&db.pool)
        .await
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cinema_hall WHERE cinema_hall_id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl CinemaSeat {
    pub async fn for_hall(hall_id: i32, db: &Database) -> Result<Vec<CinemaSeat>, sqlx::Error> {
        sqlx::query_as::<_, CinemaSeat>(
            r#"
            SELECT cinema_seat_id, seat_row, seat_number, seat_type, hall_id
            FROM cinema_seat
            WHERE hall_id = $1
            ORDER BY seat_row, seat_number
            "#,
        )
        .bind(hall_id)
        .fetch_all(&db.pool)
        .await
    }

    /// Inserts the seat unless its hall is already full. The hall row stays
    /// locked between the count and the insert, so concurrent inserts into
    /// one hall are serialized.
    pub async fn insert_within_capacity(
        fields: &SeatFields,
        db: &Database,
    ) -> Result<SeatInsert, sqlx::Error> {
        let mut tx = db.pool.begin().await?;

        let hall = sqlx::query_as::<_, CinemaHall>(
            r#"
            SELECT cinema_hall_id, hall_name, hall_type, capacity
            FROM cinema_hall
            WHERE cinema_hall_id = $1
            FOR UPDATE
            "#,
        )
        .bind(fields.hall_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(hall) = hall else {
            return Ok(SeatInsert::HallNotFound);
        };

        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cinema_seat WHERE hall_id = $1")
                .bind(hall.cinema_hall_id)
                .fetch_one(&mut *tx)
                .await?;
        if !hall.has_room(existing) {
            return Ok(SeatInsert::HallFull(hall));
        }

        let seat_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO cinema_seat (seat_row, seat_number, seat_type, hall_id)
            VALUES ($1, $2, $3, $4)
            RETURNING cinema_seat_id
            "#,
        )
        .bind(&fields.seat_row)
        .bind(fields.seat_number)
        .bind(&fields.seat_type)
        .bind(hall.cinema_hall_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SeatInsert::Inserted(seat_id))
    }

    pub async fn delete(id: i32, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cinema_seat WHERE cinema_seat_id = $1")
            .bind(id)
            .execute(&db.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
