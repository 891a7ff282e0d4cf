//! Demo data for a fresh in-memory deployment.

use chrono::{Duration, Utc};
use domain::{Booking, Event, Money, SeatingPolicy, User, Venue};

use crate::{Repositories, Result};

/// Seeds five users, three venues, one event per seating kind and five bookings.
///
/// Event dates are placed in the future relative to now so the events stay
/// bookable.
pub async fn seed_demo_data(repos: &Repositories) -> Result<()> {
    let mut users = Vec::new();
    for (first, last) in [
        ("John", "Doe"),
        ("Jane", "Smith"),
        ("Robert", "Johnson"),
        ("Emily", "Williams"),
        ("Michael", "Brown"),
    ] {
        let email = format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase());
        users.push(repos.users.add(User::new(first, last, email)).await?);
    }

    let concert_hall = repos
        .venues
        .add(Venue::new("Grand Concert Hall", "123 Music Street, New York", 5000)?)
        .await?;
    let festival_grounds = repos
        .venues
        .add(Venue::new(
            "Open Air Festival Grounds",
            "456 Park Avenue, Los Angeles",
            20000,
        )?)
        .await?;
    let jazz_club = repos
        .venues
        .add(Venue::new("Jazz Club Downtown", "789 Blues Road, Chicago", 300)?)
        .await?;

    let now = Utc::now();
    let rock = repos
        .events
        .add(
            Event::new(
                "Rock Concert 2025",
                concert_hall,
                now + Duration::days(30),
                "Concert",
                SeatingPolicy::full_reserved(5000),
            )
            .with_description("Amazing rock concert"),
        )
        .await?;
    let festival = repos
        .events
        .add(
            Event::new(
                "Summer Music Festival",
                festival_grounds,
                now + Duration::days(60),
                "Festival",
                SeatingPolicy::Open,
            )
            .with_description("All-day music festival"),
        )
        .await?;
    let jazz = repos
        .events
        .add(
            Event::new(
                "Jazz Night",
                jazz_club,
                now + Duration::days(15),
                "Concert",
                SeatingPolicy::section_reserved([("GoldenCircle", 100), ("Balcony", 200)]),
            )
            .with_description("Evening jazz performance"),
        )
        .await?;

    let seeds = [
        (users[0], rock, concert_hall, 2, None, 150, Some("PAY-123456")),
        (users[1], rock, concert_hall, 4, None, 300, Some("PAY-123457")),
        (users[2], festival, festival_grounds, 5, None, 250, Some("PAY-123458")),
        (users[0], jazz, jazz_club, 2, Some("GoldenCircle"), 200, Some("PAY-123459")),
        (users[3], jazz, jazz_club, 3, Some("Balcony"), 120, None),
    ];

    for (user, event, venue, seats, section, amount, payment_id) in seeds {
        let mut booking = Booking::new(
            user,
            event,
            venue,
            seats,
            section.map(String::from),
            Money::from_units(amount),
        )?;
        if let Some(payment_id) = payment_id {
            booking.mark_paid(payment_id)?;
        }
        repos.bookings.add(booking).await?;
    }

    tracing::info!(
        users = users.len(),
        venues = 3,
        events = 3,
        bookings = seeds.len(),
        "seeded demo data"
    );
    Ok(())
}
