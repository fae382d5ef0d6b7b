use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{
    BookingConfirmation, BookingError, BookingLedger, NewBooking, NewPayment, PaymentStatus,
    SeatStatus, SeatStatusStore, StoreError, MAX_SEATS_PER_BOOKING,
};

/// Reserves seats for a show and records the matching bookings and payments.
///
/// The orchestrator keeps no state between calls. Mutual exclusion on a seat
/// comes entirely from [`SeatStatusStore::transition_seat_status`].
#[derive(Clone)]
pub struct BookingOrchestrator {
    seats: Arc<dyn SeatStatusStore>,
    ledger: Arc<dyn BookingLedger>,
    max_seats: usize,
}

impl BookingOrchestrator {
    pub fn new(seats: Arc<dyn SeatStatusStore>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self {
            seats,
            ledger,
            max_seats: MAX_SEATS_PER_BOOKING,
        }
    }

    pub fn max_seats(&self) -> usize {
        self.max_seats
    }

    /// Reserves `seat_ids` for `user_id` on `show_id`.
    ///
    /// All seats are checked before any of them is touched, so a rejected
    /// request leaves the store and the ledger as they were. Once the commit
    /// phase has started a failure is returned as is: seats already booked by
    /// this call stay booked.
    pub async fn create_booking(
        &self,
        show_id: i32,
        user_id: i32,
        seat_ids: &[i32],
    ) -> Result<BookingConfirmation, BookingError> {
        if seat_ids.is_empty() {
            return Err(BookingError::NoSeatsSelected);
        }

        let eligible = self.check_availability(show_id, seat_ids).await?;
        if eligible > self.max_seats {
            warn!(show_id, user_id, requested = eligible, "too many seats in one booking");
            return Err(BookingError::TooManySeats {
                requested: eligible,
                max: self.max_seats,
            });
        }

        let mut booking_ids = Vec::with_capacity(eligible);
        for &seat_id in seat_ids {
            let booking_id = self.commit_seat(show_id, user_id, seat_id, eligible).await?;
            booking_ids.push(booking_id);
        }

        info!(show_id, user_id, seats = eligible, "booking confirmed");
        Ok(BookingConfirmation {
            show_id,
            user_id,
            booking_ids,
        })
    }

    /// Reads every seat in request order and stops at the first one that
    /// cannot be booked. Returns the number of eligible seats.
    async fn check_availability(
        &self,
        show_id: i32,
        seat_ids: &[i32],
    ) -> Result<usize, BookingError> {
        let mut seen = HashSet::with_capacity(seat_ids.len());

        for &seat_id in seat_ids {
            let status = match self.seats.seat_status(show_id, seat_id).await {
                Ok(status) => status,
                Err(StoreError::NotFound { .. }) => {
                    debug!(show_id, seat_id, "seat lookup missed");
                    return Err(BookingError::ShowNotFound { show_id, seat_id });
                }
                Err(e) => return Err(BookingError::storage("reading seat status")(e)),
            };

            // a repeated id would be claimed by this very request
            if status != SeatStatus::Available || !seen.insert(seat_id) {
                debug!(show_id, seat_id, %status, "seat not available");
                return Err(BookingError::SeatAlreadySelected { seat_id });
            }
        }

        Ok(seen.len())
    }

    async fn commit_seat(
        &self,
        show_id: i32,
        user_id: i32,
        seat_id: i32,
        number_of_seats: usize,
    ) -> Result<i32, BookingError> {
        self.seats
            .transition_seat_status(show_id, seat_id, SeatStatus::Available, SeatStatus::Selected)
            .await
            .map_err(|e| match e {
                StoreError::StatusChanged { .. } => {
                    warn!(show_id, seat_id, "seat taken by a concurrent booking");
                    BookingError::SeatAlreadySelected { seat_id }
                }
                StoreError::NotFound { .. } => BookingError::ShowNotFound { show_id, seat_id },
                other => BookingError::storage("selecting seat")(other),
            })?;

        let booking = NewBooking {
            number_of_seats: number_of_seats as i32,
            payment_status: PaymentStatus::Pending,
            user_id,
            show_id,
        };
        let booking_id = self
            .ledger
            .insert_booking(&booking)
            .await
            .map_err(BookingError::storage("recording booking"))?;

        self.seats
            .transition_seat_status(show_id, seat_id, SeatStatus::Selected, SeatStatus::Booked)
            .await
            .map_err(BookingError::storage("confirming seat"))?;

        self.ledger
            .insert_payment(&NewPayment::placeholder(booking_id))
            .await
            .map_err(BookingError::storage("recording payment"))?;

        debug!(show_id, seat_id, booking_id, "seat booked");
        Ok(booking_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::memory::{InMemoryLedger, InMemorySeatStore};

    const SHOW: i32 = 7;
    const USER: i32 = 42;

    fn orchestrator(
        seats: &Arc<InMemorySeatStore>,
        ledger: &Arc<InMemoryLedger>,
    ) -> BookingOrchestrator {
        BookingOrchestrator::new(seats.clone(), ledger.clone())
    }

    fn available(seat_ids: impl IntoIterator<Item = i32>) -> Arc<InMemorySeatStore> {
        Arc::new(InMemorySeatStore::with_seats(SHOW, seat_ids, SeatStatus::Available))
    }

    #[tokio::test]
    async fn books_every_requested_seat() {
        let seats = available([101, 102]);
        let ledger = Arc::new(InMemoryLedger::new());

        let confirmation = orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[101, 102])
            .await
            .unwrap();

        assert_eq!(confirmation.booking_ids.len(), 2);
        assert_eq!(seats.status_of(SHOW, 101), Some(SeatStatus::Booked));
        assert_eq!(seats.status_of(SHOW, 102), Some(SeatStatus::Booked));

        let bookings = ledger.bookings();
        assert_eq!(bookings.len(), 2);
        for (_, booking) in &bookings {
            assert_eq!(booking.number_of_seats, 2);
            assert_eq!(booking.payment_status, PaymentStatus::Pending);
            assert_eq!(booking.user_id, USER);
            assert_eq!(booking.show_id, SHOW);
        }

        let payments = ledger.payments();
        assert_eq!(payments.len(), 2);
        for (id, _) in &bookings {
            assert_eq!(payments.iter().filter(|p| p.booking_id == *id).count(), 1);
        }
        assert!(payments.iter().all(|p| p.amount == 100));
    }

    #[tokio::test]
    async fn booked_seat_is_rejected_and_left_alone() {
        let seats = Arc::new(InMemorySeatStore::with_seats(SHOW, [101], SeatStatus::Booked));
        let ledger = Arc::new(InMemoryLedger::new());

        let err = orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[101])
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::SeatAlreadySelected { seat_id: 101 }));
        assert_eq!(seats.status_of(SHOW, 101), Some(SeatStatus::Booked));
        assert!(ledger.bookings().is_empty());
    }

    #[tokio::test]
    async fn six_seats_exceed_the_limit() {
        let seats = available(1..=6);
        let ledger = Arc::new(InMemoryLedger::new());

        let err = orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[1, 2, 3, 4, 5, 6])
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::TooManySeats { requested: 6, max: 5 }));
        assert_eq!(seats.count_with_status(SHOW, SeatStatus::Available), 6);
        assert!(ledger.bookings().is_empty());
        assert!(ledger.payments().is_empty());
    }

    #[tokio::test]
    async fn five_seats_are_accepted() {
        let seats = available(1..=5);
        let ledger = Arc::new(InMemoryLedger::new());

        orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[1, 2, 3, 4, 5])
            .await
            .unwrap();

        assert_eq!(seats.count_with_status(SHOW, SeatStatus::Booked), 5);
        assert_eq!(ledger.bookings().len(), 5);
    }

    #[tokio::test]
    async fn unknown_show_is_not_found() {
        let seats = available([101]);
        let ledger = Arc::new(InMemoryLedger::new());

        let err = orchestrator(&seats, &ledger)
            .create_booking(999, USER, &[101])
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::ShowNotFound { show_id: 999, seat_id: 101 }));
    }

    #[tokio::test]
    async fn unavailable_seat_late_in_list_leaves_earlier_seats_untouched() {
        let seats = available([1, 2]);
        seats.insert(SHOW, 3, SeatStatus::Selected);
        let ledger = Arc::new(InMemoryLedger::new());

        let err = orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[1, 2, 3])
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::SeatAlreadySelected { seat_id: 3 }));
        assert_eq!(seats.status_of(SHOW, 1), Some(SeatStatus::Available));
        assert_eq!(seats.status_of(SHOW, 2), Some(SeatStatus::Available));
        assert!(ledger.bookings().is_empty());
    }

    #[tokio::test]
    async fn repeated_seat_id_is_rejected() {
        let seats = available([1, 2]);
        let ledger = Arc::new(InMemoryLedger::new());

        let err = orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[1, 2, 1])
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::SeatAlreadySelected { seat_id: 1 }));
        assert_eq!(seats.count_with_status(SHOW, SeatStatus::Available), 2);
    }

    #[tokio::test]
    async fn empty_request_is_rejected() {
        let seats = available([1]);
        let ledger = Arc::new(InMemoryLedger::new());

        let err = orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::NoSeatsSelected));
    }

    #[tokio::test]
    async fn reading_twice_returns_same_status() {
        let seats = available([101]);

        let first = seats.seat_status(SHOW, 101).await.unwrap();
        let second = seats.seat_status(SHOW, 101).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn ledger_failure_during_commit_is_not_rolled_back() {
        let seats = available([1, 2]);
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.fail_payments(true);

        let err = orchestrator(&seats, &ledger)
            .create_booking(SHOW, USER, &[1, 2])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BookingError::Storage { context: "recording payment", .. }
        ));
        // first seat went through the whole commit except its payment row
        assert_eq!(seats.status_of(SHOW, 1), Some(SeatStatus::Booked));
        assert_eq!(seats.status_of(SHOW, 2), Some(SeatStatus::Available));
        assert_eq!(ledger.bookings().len(), 1);
        assert!(ledger.payments().is_empty());
    }

    #[tokio::test]
    async fn seat_claimed_between_check_and_commit_loses_the_race() {
        // A store that reports every seat as available but already holds
        // seat 2 as selected, standing in for a concurrent claim.
        struct StaleReads(InMemorySeatStore);

        #[async_trait::async_trait]
        impl SeatStatusStore for StaleReads {
            async fn seat_status(&self, _show: i32, _seat: i32) -> Result<SeatStatus, StoreError> {
                Ok(SeatStatus::Available)
            }
            async fn set_seat_status(
                &self,
                show: i32,
                seat: i32,
                s: SeatStatus,
            ) -> Result<(), StoreError> {
                self.0.set_seat_status(show, seat, s).await
            }
            async fn transition_seat_status(
                &self,
                show: i32,
                seat: i32,
                from: SeatStatus,
                to: SeatStatus,
            ) -> Result<(), StoreError> {
                self.0.transition_seat_status(show, seat, from, to).await
            }
        }

        let inner = InMemorySeatStore::with_seats(SHOW, [1], SeatStatus::Available);
        inner.insert(SHOW, 2, SeatStatus::Selected);
        let seats = Arc::new(StaleReads(inner));
        let ledger = Arc::new(InMemoryLedger::new());

        let err = BookingOrchestrator::new(seats.clone(), ledger.clone())
            .create_booking(SHOW, USER, &[1, 2])
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::SeatAlreadySelected { seat_id: 2 }));
        assert_eq!(seats.0.status_of(SHOW, 2), Some(SeatStatus::Selected));
        assert_eq!(ledger.bookings().len(), 1);
    }
}
