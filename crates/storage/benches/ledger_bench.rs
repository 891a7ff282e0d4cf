use common::{EventId, UserId, VenueId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Booking, Money};
use storage::{BookingRepository, InMemoryBookingRepository};

fn make_booking(n: i64) -> Booking {
    let mut booking = Booking::new(
        UserId::new(n % 50),
        EventId::new(n % 10),
        VenueId::new(n % 5),
        2,
        (n % 2 == 0).then(|| "GoldenCircle".to_string()),
        Money::from_units(40),
    )
    .unwrap();
    if n % 3 == 0 {
        booking.mark_paid(format!("PAY-{n}")).unwrap();
    }
    booking
}

fn populated_ledger(rt: &tokio::runtime::Runtime, size: i64) -> InMemoryBookingRepository {
    let ledger = InMemoryBookingRepository::new();
    rt.block_on(async {
        for n in 0..size {
            ledger.add(make_booking(n)).await.unwrap();
        }
    });
    ledger
}

fn bench_add_booking(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ledger = InMemoryBookingRepository::new();
    let mut n = 0;

    c.bench_function("ledger/add_booking", |b| {
        b.iter(|| {
            n += 1;
            rt.block_on(ledger.add(make_booking(n))).unwrap();
        });
    });
}

fn bench_seat_totals(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ledger = populated_ledger(&rt, 10_000);

    c.bench_function("ledger/booking_count_for_event_10k", |b| {
        b.iter(|| {
            rt.block_on(ledger.booking_count_for_event(EventId::new(3)))
                .unwrap()
        });
    });

    c.bench_function("ledger/booking_count_for_event_section_10k", |b| {
        b.iter(|| {
            rt.block_on(ledger.booking_count_for_event_section(EventId::new(4), "GoldenCircle"))
                .unwrap()
        });
    });
}

fn bench_relational_queries(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let ledger = populated_ledger(&rt, 10_000);

    c.bench_function("ledger/paid_users_at_venue_10k", |b| {
        b.iter(|| {
            rt.block_on(ledger.find_bookings_for_paid_users_at_venue(VenueId::new(2)))
                .unwrap()
        });
    });

    c.bench_function("ledger/users_without_bookings_10k", |b| {
        b.iter(|| {
            rt.block_on(ledger.find_users_without_bookings_in_venue(VenueId::new(2)))
                .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_add_booking,
    bench_seat_totals,
    bench_relational_queries
);
criterion_main!(benches);
