use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::VenueId;
use domain::Venue;
use tokio::sync::RwLock;

use crate::repository::VenueRepository;
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct VenueState {
    venues: BTreeMap<VenueId, Venue>,
    last_id: i64,
}

/// In-memory venue store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVenueRepository {
    state: Arc<RwLock<VenueState>>,
}

impl InMemoryVenueRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VenueRepository for InMemoryVenueRepository {
    async fn get_by_id(&self, id: VenueId) -> Result<Option<Venue>> {
        Ok(self.state.read().await.venues.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Venue>> {
        Ok(self.state.read().await.venues.values().cloned().collect())
    }

    async fn add(&self, mut venue: Venue) -> Result<VenueId> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        venue.id = VenueId::new(state.last_id);
        let id = venue.id;
        state.venues.insert(id, venue);
        Ok(id)
    }

    async fn update(&self, venue: Venue) -> Result<()> {
        let mut state = self.state.write().await;
        match state.venues.get_mut(&venue.id) {
            Some(stored) => {
                *stored = venue;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "Venue",
                id: venue.id.as_i64(),
            }),
        }
    }

    async fn delete(&self, id: VenueId) -> Result<bool> {
        Ok(self.state.write().await.venues.remove(&id).is_some())
    }
}
