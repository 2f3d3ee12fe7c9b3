//! Reservation and return behaviour against an in-memory database

mod common;

use common::TestHarness;
use maktabty_server::{error::AppError, models::BookingStatus};

#[tokio::test]
async fn reserve_decrements_and_return_restores() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;
    let book = harness.create_book("Python Programming", 2).await;

    let booking = harness
        .services
        .reservations
        .reserve(Some(&reader), book.id)
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Reserved);
    assert_eq!(booking.user_id, reader.user_id);
    assert!(booking.returned_at.is_none());
    assert_eq!(harness.copies(book.id).await, 1);

    let outcome = harness
        .services
        .reservations
        .return_booking(Some(&reader), booking.id)
        .await
        .unwrap();
    assert!(outcome.credited);
    assert_eq!(outcome.booking.status, BookingStatus::Returned);
    assert!(outcome.booking.returned_at.is_some());
    assert_eq!(harness.copies(book.id).await, 2);
}

#[tokio::test]
async fn two_readers_share_a_single_copy() {
    let harness = TestHarness::new().await;
    let x = harness.create_user("x", false).await;
    let y = harness.create_user("y", false).await;
    let book = harness.create_book("Flask Web Development", 1).await;
    let reservations = &harness.services.reservations;

    let first = reservations.reserve(Some(&x), book.id).await.unwrap();
    assert_eq!(harness.copies(book.id).await, 0);

    let err = reservations.reserve(Some(&y), book.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unavailable(_)));

    reservations.return_booking(Some(&x), first.id).await.unwrap();
    assert_eq!(harness.copies(book.id).await, 1);

    let second = reservations.reserve(Some(&y), book.id).await.unwrap();
    assert_eq!(second.user_id, y.user_id);
    assert_eq!(harness.copies(book.id).await, 0);
    assert_eq!(harness.reserved(book.id).await, 1);
}

#[tokio::test]
async fn unavailable_reservation_changes_nothing() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;
    let book = harness.create_book("Data Science Handbook", 0).await;

    let err = harness
        .services
        .reservations
        .reserve(Some(&reader), book.id)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unavailable(_)));
    assert_eq!(harness.copies(book.id).await, 0);
    assert_eq!(harness.reserved(book.id).await, 0);
    let bookings = harness.services.reservations.my_bookings(&reader).await.unwrap();
    assert!(bookings.is_empty());
}

#[tokio::test]
async fn reserving_unknown_book_is_not_found() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;

    let err = harness
        .services
        .reservations
        .reserve(Some(&reader), 999)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn anonymous_reserve_and_return_are_rejected() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;
    let book = harness.create_book("Python Programming", 1).await;
    let reservations = &harness.services.reservations;

    let err = reservations.reserve(None, book.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated(_)));
    assert_eq!(harness.copies(book.id).await, 1);

    let booking = reservations.reserve(Some(&reader), book.id).await.unwrap();
    let err = reservations.return_booking(None, booking.id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated(_)));
    assert_eq!(harness.copies(book.id).await, 0);
}

#[tokio::test]
async fn double_return_credits_once() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;
    let book = harness.create_book("Python Programming", 3).await;
    let reservations = &harness.services.reservations;

    let booking = reservations.reserve(Some(&reader), book.id).await.unwrap();
    assert_eq!(harness.copies(book.id).await, 2);

    let first = reservations.return_booking(Some(&reader), booking.id).await.unwrap();
    let second = reservations.return_booking(Some(&reader), booking.id).await.unwrap();

    assert!(first.credited);
    assert!(!second.credited);
    assert_eq!(second.booking.status, BookingStatus::Returned);
    assert_eq!(second.booking.returned_at, first.booking.returned_at);
    assert_eq!(harness.copies(book.id).await, 3);
}

#[tokio::test]
async fn other_readers_cannot_return_a_booking() {
    let harness = TestHarness::new().await;
    let owner = harness.create_user("owner", false).await;
    let other = harness.create_user("other", false).await;
    let book = harness.create_book("Python Programming", 1).await;
    let reservations = &harness.services.reservations;

    let booking = reservations.reserve(Some(&owner), book.id).await.unwrap();

    let err = reservations.return_booking(Some(&other), booking.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(harness.copies(book.id).await, 0);
    assert_eq!(harness.reserved(book.id).await, 1);
}

#[tokio::test]
async fn admin_can_return_any_booking() {
    let harness = TestHarness::new().await;
    let owner = harness.create_user("owner", false).await;
    let admin = harness.create_user("admin", true).await;
    let book = harness.create_book("Python Programming", 1).await;
    let reservations = &harness.services.reservations;

    let booking = reservations.reserve(Some(&owner), book.id).await.unwrap();
    let outcome = reservations.return_booking(Some(&admin), booking.id).await.unwrap();

    assert!(outcome.credited);
    assert_eq!(outcome.booking.user_id, owner.user_id);
    assert_eq!(harness.copies(book.id).await, 1);
}

#[tokio::test]
async fn returning_unknown_booking_is_not_found() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;

    let err = harness
        .services
        .reservations
        .return_booking(Some(&reader), 42)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn reader_may_hold_several_copies_of_one_book() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;
    let book = harness.create_book("Python Programming", 2).await;
    let reservations = &harness.services.reservations;

    reservations.reserve(Some(&reader), book.id).await.unwrap();
    reservations.reserve(Some(&reader), book.id).await.unwrap();

    assert_eq!(harness.copies(book.id).await, 0);
    assert_eq!(harness.reserved(book.id).await, 2);
}

#[tokio::test]
async fn my_bookings_lists_newest_first_with_titles() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;
    let other = harness.create_user("other", false).await;
    let python = harness.create_book("Python Programming", 1).await;
    let flask = harness.create_book("Flask Web Development", 2).await;
    let reservations = &harness.services.reservations;

    let first = reservations.reserve(Some(&reader), python.id).await.unwrap();
    let second = reservations.reserve(Some(&reader), flask.id).await.unwrap();
    reservations.reserve(Some(&other), flask.id).await.unwrap();
    reservations.return_booking(Some(&reader), first.id).await.unwrap();

    let bookings = reservations.my_bookings(&reader).await.unwrap();

    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].id, second.id);
    assert_eq!(bookings[0].book_title, "Flask Web Development");
    assert_eq!(bookings[0].status, BookingStatus::Reserved);
    assert_eq!(bookings[1].id, first.id);
    assert_eq!(bookings[1].status, BookingStatus::Returned);
}

#[tokio::test]
async fn availability_tracks_outstanding_reservations() {
    let harness = TestHarness::new().await;
    let readers = [
        harness.create_user("a", false).await,
        harness.create_user("b", false).await,
        harness.create_user("c", false).await,
    ];
    let book = harness.create_book("Python Programming", 2).await;
    let reservations = &harness.services.reservations;

    let mut held = Vec::new();
    for reader in &readers {
        match reservations.reserve(Some(reader), book.id).await {
            Ok(booking) => held.push((*reader, booking.id)),
            Err(AppError::Unavailable(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
        let copies = harness.copies(book.id).await;
        assert!(copies >= 0);
        assert_eq!(copies + harness.reserved(book.id).await, 2);
    }
    assert_eq!(held.len(), 2);

    for (reader, booking_id) in held {
        reservations.return_booking(Some(&reader), booking_id).await.unwrap();
        reservations.return_booking(Some(&reader), booking_id).await.unwrap();
        assert_eq!(harness.copies(book.id).await + harness.reserved(book.id).await, 2);
    }
    assert_eq!(harness.copies(book.id).await, 2);
}

#[tokio::test]
async fn concurrent_reservations_never_oversell() {
    let harness = TestHarness::new().await;
    let book = harness.create_book("Python Programming", 3).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let reader = harness.create_user(&format!("reader{i}"), false).await;
        let services = harness.services.clone();
        handles.push(tokio::spawn(async move {
            services.reservations.reserve(Some(&reader), book.id).await
        }));
    }

    let mut granted = 0;
    let mut refused = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => granted += 1,
            Err(AppError::Unavailable(_)) => refused += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(granted, 3);
    assert_eq!(refused, 7);
    assert_eq!(harness.copies(book.id).await, 0);
    assert_eq!(harness.reserved(book.id).await, 3);
}

#[tokio::test]
async fn concurrent_returns_credit_once() {
    let harness = TestHarness::new().await;
    let reader = harness.create_user("reader", false).await;
    let book = harness.create_book("Python Programming", 1).await;
    let booking = harness
        .services
        .reservations
        .reserve(Some(&reader), book.id)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let services = harness.services.clone();
        handles.push(tokio::spawn(async move {
            services.reservations.return_booking(Some(&reader), booking.id).await
        }));
    }

    let mut credited = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().credited {
            credited += 1;
        }
    }

    assert_eq!(credited, 1);
    assert_eq!(harness.copies(book.id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pooled_reservations_never_oversell() {
    let harness = TestHarness::with_file_db(5).await;
    let book = harness.create_book("Python Programming", 3).await;

    let mut readers = Vec::new();
    for i in 0..20 {
        readers.push(harness.create_user(&format!("reader{i}"), false).await);
    }

    let handles: Vec<_> = readers
        .into_iter()
        .map(|reader| {
            let services = harness.services.clone();
            tokio::spawn(async move { services.reservations.reserve(Some(&reader), book.id).await })
        })
        .collect();

    let mut granted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => granted += 1,
            Err(AppError::Unavailable(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(granted, 3);
    assert_eq!(harness.copies(book.id).await, 0);
    assert_eq!(harness.reserved(book.id).await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pooled_returns_credit_once() {
    let harness = TestHarness::with_file_db(5).await;
    let reader = harness.create_user("reader", false).await;
    let book = harness.create_book("Python Programming", 1).await;
    let booking = harness
        .services
        .reservations
        .reserve(Some(&reader), book.id)
        .await
        .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let services = harness.services.clone();
            tokio::spawn(async move {
                services.reservations.return_booking(Some(&reader), booking.id).await
            })
        })
        .collect();

    let mut credited = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().credited {
            credited += 1;
        }
    }

    assert_eq!(credited, 1);
    assert_eq!(harness.copies(book.id).await, 1);
    assert_eq!(harness.reserved(book.id).await, 0);
}
