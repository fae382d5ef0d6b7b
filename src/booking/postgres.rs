use anyhow::Context;
use async_trait::async_trait;

use super::{BookingLedger, NewBooking, NewPayment, SeatStatus, SeatStatusStore, StoreError};
use crate::database::Database;

/// Seat statuses backed by the `show_seat` table.
#[derive(Clone)]
pub struct PgSeatStore {
    db: Database,
}

impl PgSeatStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SeatStatusStore for PgSeatStore {
    async fn seat_status(&self, show_id: i32, seat_id: i32) -> Result<SeatStatus, StoreError> {
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM show_seat WHERE show_seat_id = $1 AND show_id = $2",
        )
        .bind(seat_id)
        .bind(show_id)
        .fetch_optional(&self.db.pool)
        .await
        .context("failed to read show seat status")?
        .ok_or(StoreError::NotFound { show_id, seat_id })?;

        Ok(status.parse::<SeatStatus>().context("corrupt show seat status")?)
    }

    async fn set_seat_status(
        &self,
        show_id: i32,
        seat_id: i32,
        status: SeatStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE show_seat SET status = $1 WHERE show_seat_id = $2 AND show_id = $3",
        )
        .bind(status.as_str())
        .bind(seat_id)
        .bind(show_id)
        .execute(&self.db.pool)
        .await
        .context("failed to update show seat status")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { show_id, seat_id });
        }
        Ok(())
    }

    async fn transition_seat_status(
        &self,
        show_id: i32,
        seat_id: i32,
        expected: SeatStatus,
        next: SeatStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE show_seat
            SET status = $1
            WHERE show_seat_id = $2 AND show_id = $3 AND status = $4
            "#,
        )
        .bind(next.as_str())
        .bind(seat_id)
        .bind(show_id)
        .bind(expected.as_str())
        .execute(&self.db.pool)
        .await
        .context("failed to transition show seat status")?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        // nothing matched: either the seat is gone or somebody else moved it
        self.seat_status(show_id, seat_id).await?;
        Err(StoreError::StatusChanged {
            show_id,
            seat_id,
            expected,
        })
    }
}

/// Bookings and payments backed by the `booking` and `payment` tables.
#[derive(Clone)]
pub struct PgBookingLedger {
    db: Database,
}

impl PgBookingLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookingLedger for PgBookingLedger {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<i32, StoreError> {
        let booking_id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO booking (number_of_seats, status, user_id, show_id)
            VALUES ($1, $2, $3, $4)
            RETURNING booking_id
            "#,
        )
        .bind(booking.number_of_seats)
        .bind(booking.payment_status.as_str())
        .bind(booking.user_id)
        .bind(booking.show_id)
        .fetch_one(&self.db.pool)
        .await
        .context("failed to insert booking")?;

        Ok(booking_id)
    }

    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO payment (amount, remote_transaction_id, payment_method, booking_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(payment.amount)
        .bind(payment.remote_transaction_id)
        .bind(&payment.payment_method)
        .bind(payment.booking_id)
        .execute(&self.db.pool)
        .await
        .context("failed to insert payment")?;

        Ok(())
    }
}
