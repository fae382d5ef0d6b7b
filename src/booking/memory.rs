//! In-process seat store and ledger, used by tests and benchmarks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{BookingLedger, NewBooking, NewPayment, SeatStatus, SeatStatusStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemorySeatStore {
    seats: Mutex<HashMap<(i32, i32), SeatStatus>>,
}

impl InMemorySeatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `seat_ids` for `show_id`, all in `status`.
    pub fn with_seats(
        show_id: i32,
        seat_ids: impl IntoIterator<Item = i32>,
        status: SeatStatus,
    ) -> Self {
        let store = Self::new();
        for seat_id in seat_ids {
            store.insert(show_id, seat_id, status);
        }
        store
    }

    pub fn insert(&self, show_id: i32, seat_id: i32, status: SeatStatus) {
        self.lock().insert((show_id, seat_id), status);
    }

    pub fn status_of(&self, show_id: i32, seat_id: i32) -> Option<SeatStatus> {
        self.lock().get(&(show_id, seat_id)).copied()
    }

    pub fn count_with_status(&self, show_id: i32, status: SeatStatus) -> usize {
        self.lock()
            .iter()
            .filter(|((show, _), s)| *show == show_id && **s == status)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(i32, i32), SeatStatus>> {
        self.seats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SeatStatusStore for InMemorySeatStore {
    async fn seat_status(&self, show_id: i32, seat_id: i32) -> Result<SeatStatus, StoreError> {
        self.status_of(show_id, seat_id)
            .ok_or(StoreError::NotFound { show_id, seat_id })
    }

    async fn set_seat_status(
        &self,
        show_id: i32,
        seat_id: i32,
        status: SeatStatus,
    ) -> Result<(), StoreError> {
        match self.lock().get_mut(&(show_id, seat_id)) {
            Some(current) => {
                *current = status;
                Ok(())
            }
            None => Err(StoreError::NotFound { show_id, seat_id }),
        }
    }

    async fn transition_seat_status(
        &self,
        show_id: i32,
        seat_id: i32,
        expected: SeatStatus,
        next: SeatStatus,
    ) -> Result<(), StoreError> {
        let mut seats = self.lock();
        match seats.get_mut(&(show_id, seat_id)) {
            Some(current) if *current == expected => {
                *current = next;
                Ok(())
            }
            Some(_) => Err(StoreError::StatusChanged {
                show_id,
                seat_id,
                expected,
            }),
            None => Err(StoreError::NotFound { show_id, seat_id }),
        }
    }
}

/// Ledger that keeps rows in memory and hands out sequential ids.
#[derive(Debug)]
pub struct InMemoryLedger {
    bookings: Mutex<Vec<(i32, NewBooking)>>,
    payments: Mutex<Vec<NewPayment>>,
    next_id: AtomicI32,
    fail_payments: AtomicBool,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            payments: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
            fail_payments: AtomicBool::new(false),
        }
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `insert_payment` fail with a backend error.
    pub fn fail_payments(&self, fail: bool) {
        self.fail_payments.store(fail, Ordering::SeqCst);
    }

    pub fn bookings(&self) -> Vec<(i32, NewBooking)> {
        self.bookings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn payments(&self) -> Vec<NewPayment> {
        self.payments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl BookingLedger for InMemoryLedger {
    async fn insert_booking(&self, booking: &NewBooking) -> Result<i32, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.bookings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, booking.clone()));
        Ok(id)
    }

    async fn insert_payment(&self, payment: &NewPayment) -> Result<(), StoreError> {
        if self.fail_payments.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("payment table unavailable").into());
        }
        self.payments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payment.clone());
        Ok(())
    }
}
