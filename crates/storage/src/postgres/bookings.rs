use async_trait::async_trait;
use common::{BookingId, EventId, UserId, VenueId};
use domain::{Booking, Money, PaymentStatus};
use sqlx::{Row, postgres::PgRow};

use super::{PostgresStore, ensure_updated};
use crate::Result;
use crate::repository::BookingRepository;

const BOOKING_COLUMNS: &str = "id, user_id, event_id, venue_id, number_of_seats, \
                               section_identifier, total_amount_cents, payment_status, \
                               payment_id, booking_date, created_at";

fn row_to_booking(row: PgRow) -> Result<Booking> {
    let status: String = row.try_get("payment_status")?;

    Ok(Booking::restore(
        BookingId::new(row.try_get("id")?),
        UserId::new(row.try_get("user_id")?),
        EventId::new(row.try_get("event_id")?),
        VenueId::new(row.try_get("venue_id")?),
        row.try_get("number_of_seats")?,
        row.try_get("section_identifier")?,
        Money::from_cents(row.try_get("total_amount_cents")?),
        status.parse::<PaymentStatus>()?,
        row.try_get("payment_id")?,
        row.try_get("booking_date")?,
        row.try_get("created_at")?,
    ))
}

impl PostgresStore {
    async fn bookings_where(&self, filter: &str, id: i64) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE {filter} = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(row_to_booking).collect()
    }
}

#[async_trait]
impl BookingRepository for PostgresStore {
    async fn get_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        sqlx::query(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(self.pool())
            .await?
            .map(row_to_booking)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!("SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id"))
            .fetch_all(self.pool())
            .await?;

        rows.into_iter().map(row_to_booking).collect()
    }

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Vec<Booking>> {
        self.bookings_where("user_id", user_id.as_i64()).await
    }

    async fn get_by_venue_id(&self, venue_id: VenueId) -> Result<Vec<Booking>> {
        self.bookings_where("venue_id", venue_id.as_i64()).await
    }

    async fn get_by_event_id(&self, event_id: EventId) -> Result<Vec<Booking>> {
        self.bookings_where("event_id", event_id.as_i64()).await
    }

    async fn add(&self, booking: Booking) -> Result<BookingId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (user_id, event_id, venue_id, number_of_seats, section_identifier,
                                  total_amount_cents, payment_status, payment_id, booking_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(booking.user_id.as_i64())
        .bind(booking.event_id.as_i64())
        .bind(booking.venue_id.as_i64())
        .bind(booking.number_of_seats())
        .bind(&booking.section_identifier)
        .bind(booking.total_amount.cents())
        .bind(booking.payment_status().as_str())
        .bind(booking.payment_id())
        .bind(booking.booking_date)
        .bind(booking.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(BookingId::new(id))
    }

    async fn update(&self, booking: Booking) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET user_id = $2, event_id = $3, venue_id = $4, number_of_seats = $5,
                section_identifier = $6, total_amount_cents = $7, payment_status = $8,
                payment_id = $9, booking_date = $10
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_i64())
        .bind(booking.user_id.as_i64())
        .bind(booking.event_id.as_i64())
        .bind(booking.venue_id.as_i64())
        .bind(booking.number_of_seats())
        .bind(&booking.section_identifier)
        .bind(booking.total_amount.cents())
        .bind(booking.payment_status().as_str())
        .bind(booking.payment_id())
        .bind(booking.booking_date)
        .execute(self.pool())
        .await?;

        ensure_updated(result.rows_affected(), "Booking", booking.id.as_i64())
    }

    async fn delete(&self, id: BookingId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn booking_count_for_event(&self, event_id: EventId) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(number_of_seats), 0)::BIGINT FROM bookings WHERE event_id = $1",
        )
        .bind(event_id.as_i64())
        .fetch_one(self.pool())
        .await?;

        Ok(total)
    }

    async fn booking_count_for_event_section(
        &self,
        event_id: EventId,
        section: &str,
    ) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(number_of_seats), 0)::BIGINT
            FROM bookings
            WHERE event_id = $1 AND section_identifier = $2
            "#,
        )
        .bind(event_id.as_i64())
        .bind(section)
        .fetch_one(self.pool())
        .await?;

        Ok(total)
    }

    async fn find_bookings_for_paid_users_at_venue(
        &self,
        venue_id: VenueId,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE venue_id = $1
              AND user_id IN (
                  SELECT DISTINCT user_id
                  FROM bookings
                  WHERE venue_id = $1 AND payment_status = 'Paid'
              )
            ORDER BY id
            "#
        ))
        .bind(venue_id.as_i64())
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(row_to_booking).collect()
    }

    async fn find_users_without_bookings_in_venue(
        &self,
        venue_id: VenueId,
    ) -> Result<Vec<UserId>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT b.user_id
            FROM bookings b
            WHERE NOT EXISTS (
                SELECT 1 FROM bookings v
                WHERE v.user_id = b.user_id AND v.venue_id = $1
            )
            ORDER BY b.user_id
            "#,
        )
        .bind(venue_id.as_i64())
        .fetch_all(self.pool())
        .await?;

        Ok(ids.into_iter().map(UserId::new).collect())
    }
}
