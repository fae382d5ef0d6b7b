//! Seat booking core.
//!
//! A booking request runs in two phases: every requested seat is checked
//! first, and only when all of them are bookable are the seats claimed and
//! written to the ledger. Claims go through a conditional status update so
//! that two concurrent requests can never both take the same seat.

pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod postgres;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use error::{BookingError, StoreError};
pub use orchestrator::BookingOrchestrator;
pub use store::{BookingLedger, SeatStatusStore};

/// Upper bound on the seats a single request may reserve.
pub const MAX_SEATS_PER_BOOKING: usize = 5;

/// Amount written to the payment row until a real gateway is wired in.
pub const PLACEHOLDER_PAYMENT_AMOUNT: i32 = 100;

/// Status of one seat for one show. Stored as text in `show_seat.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "Available",
            SeatStatus::Selected => "Selected",
            SeatStatus::Booked => "Booked",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown seat status `{0}`")]
pub struct UnknownSeatStatus(pub String);

impl FromStr for SeatStatus {
    type Err = UnknownSeatStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(SeatStatus::Available),
            "Selected" => Ok(SeatStatus::Selected),
            "Booked" => Ok(SeatStatus::Booked),
            other => Err(UnknownSeatStatus(other.to_string())),
        }
    }
}

/// Payment state recorded on a booking row. New bookings always start pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub number_of_seats: i32,
    pub payment_status: PaymentStatus,
    pub user_id: i32,
    pub show_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub amount: i32,
    pub remote_transaction_id: i32,
    pub payment_method: String,
    pub booking_id: i32,
}

impl NewPayment {
    /// Payment row recorded for a booking before any gateway is involved.
    pub fn placeholder(booking_id: i32) -> Self {
        Self {
            amount: PLACEHOLDER_PAYMENT_AMOUNT,
            remote_transaction_id: 0,
            payment_method: String::new(),
            booking_id,
        }
    }
}

/// Result of a successful booking: one ledger row per reserved seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingConfirmation {
    pub show_id: i32,
    pub user_id: i32,
    pub booking_ids: Vec<i32>,
}
