use async_trait::async_trait;
use common::{EventId, VenueId};
use domain::{Event, SeatingPolicy};
use sqlx::{Row, postgres::PgRow};

use super::{PostgresStore, ensure_updated};
use crate::Result;
use crate::repository::EventRepository;

const EVENT_COLUMNS: &str = "id, name, description, venue_id, event_date, event_type, \
                             seating_type, seating_configuration, created_at";

fn row_to_event(row: PgRow) -> Result<Event> {
    let seating_type: String = row.try_get("seating_type")?;
    let configuration: Option<serde_json::Value> = row.try_get("seating_configuration")?;

    Ok(Event {
        id: EventId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        venue_id: VenueId::new(row.try_get("venue_id")?),
        event_date: row.try_get("event_date")?,
        event_type: row.try_get("event_type")?,
        seating: SeatingPolicy::from_record(&seating_type, configuration.as_ref()),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl EventRepository for PostgresStore {
    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>> {
        sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(self.pool())
            .await?
            .map(row_to_event)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id"))
            .fetch_all(self.pool())
            .await?;

        rows.into_iter().map(row_to_event).collect()
    }

    async fn get_future_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_date > NOW() ORDER BY event_date, id"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(row_to_event).collect()
    }

    async fn add(&self, event: Event) -> Result<EventId> {
        let seating = event.seating.to_record();

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO events (name, description, venue_id, event_date, event_type,
                                seating_type, seating_configuration, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.venue_id.as_i64())
        .bind(event.event_date)
        .bind(&event.event_type)
        .bind(&seating.type_name)
        .bind(&seating.configuration)
        .bind(event.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(EventId::new(id))
    }

    async fn update(&self, event: Event) -> Result<()> {
        let seating = event.seating.to_record();

        let result = sqlx::query(
            r#"
            UPDATE events
            SET name = $2, description = $3, venue_id = $4, event_date = $5,
                event_type = $6, seating_type = $7, seating_configuration = $8
            WHERE id = $1
            "#,
        )
        .bind(event.id.as_i64())
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.venue_id.as_i64())
        .bind(event.event_date)
        .bind(&event.event_type)
        .bind(&seating.type_name)
        .bind(&seating.configuration)
        .execute(self.pool())
        .await?;

        ensure_updated(result.rows_affected(), "Event", event.id.as_i64())
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
