use async_trait::async_trait;

use super::{NewBooking, NewPayment, SeatStatus, StoreError};

/// Per-show seat status, keyed by (show id, show seat id).
#[async_trait]
pub trait SeatStatusStore: Send + Sync {
    /// Current status, or [`StoreError::NotFound`] when the seat is not part of the show.
    async fn seat_status(&self, show_id: i32, seat_id: i32) -> Result<SeatStatus, StoreError>;

    /// Overwrites the status regardless of its current value.
    async fn set_seat_status(
        &self,
        show_id: i32,
        seat_id: i32,
        status: SeatStatus,
    ) -> Result<(), StoreError>;

    /// Moves the seat from `expected` to `next` atomically.
    ///
    /// Returns [`StoreError::StatusChanged`] without writing anything when the
    /// seat is not in `expected` at the time of the update.
    async fn transition_seat_status(
        &self,
        show_id: i32,
        seat_id: i32,
        expected: SeatStatus,
        next: SeatStatus,
    ) -> Result<(), StoreError>;
}

/// Append-only record of bookings and their payments.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<i32, StoreError>;

    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), StoreError>;
}
