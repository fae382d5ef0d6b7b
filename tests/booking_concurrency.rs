use std::sync::Arc;

use futures::future::join_all;
use proptest::prelude::*;

use cinema_tickets::booking::memory::{InMemoryLedger, InMemorySeatStore};
use cinema_tickets::booking::{BookingError, BookingOrchestrator, SeatStatus, SeatStatusStore};

const SHOW: i32 = 7;

fn orchestrator(
    store: &Arc<InMemorySeatStore>,
    ledger: &Arc<InMemoryLedger>,
) -> BookingOrchestrator {
    BookingOrchestrator::new(store.clone(), ledger.clone())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_of_many_concurrent_requests_gets_the_seat() {
    let store = Arc::new(InMemorySeatStore::with_seats(SHOW, 1..=10, SeatStatus::Available));
    let ledger = Arc::new(InMemoryLedger::new());
    let booking = orchestrator(&store, &ledger);

    let attempts = (1..=32).map(|user_id| {
        let booking = booking.clone();
        tokio::spawn(async move { booking.create_booking(SHOW, user_id, &[4]).await })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("booking task panicked"))
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(BookingError::SeatAlreadySelected { seat_id: 4 })
        ));
    }

    assert_eq!(store.status_of(SHOW, 4), Some(SeatStatus::Booked));
    assert_eq!(ledger.bookings().len(), 1);
    assert_eq!(ledger.payments().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_requests_never_share_a_seat() {
    let store = Arc::new(InMemorySeatStore::with_seats(SHOW, 1..=6, SeatStatus::Available));
    let ledger = Arc::new(InMemoryLedger::new());
    let booking = orchestrator(&store, &ledger);

    let requests: Vec<(i32, Vec<i32>)> = vec![
        (1, vec![1, 2, 3]),
        (2, vec![3, 4]),
        (3, vec![4, 5, 6]),
        (4, vec![1, 6]),
    ];

    let attempts = requests.into_iter().map(|(user_id, seats)| {
        let booking = booking.clone();
        tokio::spawn(async move { booking.create_booking(SHOW, user_id, &seats).await })
    });
    join_all(attempts).await;

    // one booking row per claimed seat, so a double claim would show up here
    let bookings = ledger.bookings();
    assert!(bookings.len() <= 6);
    assert_eq!(store.count_with_status(SHOW, SeatStatus::Booked), bookings.len());
    assert_eq!(store.count_with_status(SHOW, SeatStatus::Selected), 0);
    assert_eq!(ledger.payments().len(), bookings.len());
}

#[tokio::test]
async fn seats_of_another_show_are_not_found() {
    let store = Arc::new(InMemorySeatStore::with_seats(SHOW, 1..=3, SeatStatus::Available));
    let ledger = Arc::new(InMemoryLedger::new());
    let booking = orchestrator(&store, &ledger);

    let err = booking.create_booking(SHOW + 1, 1, &[1]).await.unwrap_err();
    assert!(matches!(err, BookingError::ShowNotFound { seat_id: 1, .. }));
    assert_eq!(store.seat_status(SHOW, 1).await.unwrap(), SeatStatus::Available);
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

proptest! {
    #[test]
    fn up_to_five_seats_are_booked_and_more_are_refused(count in 1usize..=12) {
        let store = Arc::new(InMemorySeatStore::with_seats(SHOW, 1..=12, SeatStatus::Available));
        let ledger = Arc::new(InMemoryLedger::new());
        let booking = orchestrator(&store, &ledger);
        let seats: Vec<i32> = (1..=count as i32).collect();

        let result = runtime().block_on(booking.create_booking(SHOW, 1, &seats));

        if count <= booking.max_seats() {
            let confirmation = result.expect("booking within the limit");
            prop_assert_eq!(confirmation.booking_ids.len(), count);
            prop_assert_eq!(store.count_with_status(SHOW, SeatStatus::Booked), count);
            for (_, row) in ledger.bookings() {
                prop_assert_eq!(row.number_of_seats, count as i32);
            }
        } else {
            let is_too_many = matches!(
                result,
                Err(BookingError::TooManySeats { requested, max: 5 }) if requested == count
            );
            prop_assert!(is_too_many);
            prop_assert_eq!(store.count_with_status(SHOW, SeatStatus::Available), 12);
            prop_assert!(ledger.bookings().is_empty());
        }
    }

    #[test]
    fn a_taken_seat_anywhere_in_the_request_leaves_everything_untouched(
        count in 2usize..=5,
        taken_at in 0usize..5,
    ) {
        let taken_at = taken_at % count;
        let store = Arc::new(InMemorySeatStore::with_seats(SHOW, 1..=5, SeatStatus::Available));
        let taken_seat = taken_at as i32 + 1;
        store.insert(SHOW, taken_seat, SeatStatus::Booked);
        let ledger = Arc::new(InMemoryLedger::new());
        let booking = orchestrator(&store, &ledger);
        let seats: Vec<i32> = (1..=count as i32).collect();

        let result = runtime().block_on(booking.create_booking(SHOW, 1, &seats));

        let rejected = matches!(
            result,
            Err(BookingError::SeatAlreadySelected { seat_id }) if seat_id == taken_seat
        );
        prop_assert!(rejected);
        prop_assert_eq!(store.count_with_status(SHOW, SeatStatus::Available), 4);
        prop_assert!(ledger.bookings().is_empty());
    }
}
