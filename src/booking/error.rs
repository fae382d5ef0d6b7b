use thiserror::Error;

use super::SeatStatus;

/// Failures reported by the seat store and the booking ledger.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("seat {seat_id} does not exist for show {show_id}")]
    NotFound { show_id: i32, seat_id: i32 },

    /// A conditional update found the seat in a different status.
    #[error("seat {seat_id} for show {show_id} is no longer {expected}")]
    StatusChanged {
        show_id: i32,
        seat_id: i32,
        expected: SeatStatus,
    },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Every way a booking request can fail.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("show {show_id} has no seat {seat_id}")]
    ShowNotFound { show_id: i32, seat_id: i32 },

    #[error("seat {seat_id} is not available")]
    SeatAlreadySelected { seat_id: i32 },

    #[error("{requested} seats requested, at most {max} allowed")]
    TooManySeats { requested: usize, max: usize },

    #[error("no seats were selected")]
    NoSeatsSelected,

    #[error("storage failure while {context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl BookingError {
    pub(crate) fn storage(context: &'static str) -> impl FnOnce(StoreError) -> BookingError {
        move |source| BookingError::Storage { context, source }
    }
}
