use async_trait::async_trait;
use common::VenueId;
use domain::Venue;
use sqlx::{Row, postgres::PgRow};

use super::{PostgresStore, ensure_updated};
use crate::Result;
use crate::repository::VenueRepository;

const VENUE_COLUMNS: &str = "id, name, location, total_capacity, created_at";

fn row_to_venue(row: PgRow) -> Result<Venue> {
    Ok(Venue::restore(
        VenueId::new(row.try_get("id")?),
        row.try_get("name")?,
        row.try_get("location")?,
        row.try_get("total_capacity")?,
        row.try_get("created_at")?,
    ))
}

#[async_trait]
impl VenueRepository for PostgresStore {
    async fn get_by_id(&self, id: VenueId) -> Result<Option<Venue>> {
        sqlx::query(&format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"))
            .bind(id.as_i64())
            .fetch_optional(self.pool())
            .await?
            .map(row_to_venue)
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<Venue>> {
        let rows = sqlx::query(&format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id"))
            .fetch_all(self.pool())
            .await?;

        rows.into_iter().map(row_to_venue).collect()
    }

    async fn add(&self, venue: Venue) -> Result<VenueId> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO venues (name, location, total_capacity, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&venue.name)
        .bind(&venue.location)
        .bind(venue.total_capacity())
        .bind(venue.created_at)
        .fetch_one(self.pool())
        .await?;

        Ok(VenueId::new(id))
    }

    async fn update(&self, venue: Venue) -> Result<()> {
        let result = sqlx::query(
            "UPDATE venues SET name = $2, location = $3, total_capacity = $4 WHERE id = $1",
        )
        .bind(venue.id.as_i64())
        .bind(&venue.name)
        .bind(&venue.location)
        .bind(venue.total_capacity())
        .execute(self.pool())
        .await?;

        ensure_updated(result.rows_affected(), "Venue", venue.id.as_i64())
    }

    async fn delete(&self, id: VenueId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
