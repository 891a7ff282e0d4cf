use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::EventId;
use domain::Event;
use tokio::sync::RwLock;

use crate::repository::EventRepository;
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct EventState {
    events: BTreeMap<EventId, Event>,
    last_id: i64,
}

/// In-memory event store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventRepository {
    state: Arc<RwLock<EventState>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.state.read().await.events.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Event>> {
        Ok(self.state.read().await.events.values().cloned().collect())
    }

    async fn get_future_events(&self) -> Result<Vec<Event>> {
        let now = Utc::now();
        let state = self.state.read().await;
        let mut events: Vec<_> = state
            .events
            .values()
            .filter(|e| e.is_future_at(now))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.event_date);
        Ok(events)
    }

    async fn add(&self, mut event: Event) -> Result<EventId> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        event.id = EventId::new(state.last_id);
        let id = event.id;
        state.events.insert(id, event);
        Ok(id)
    }

    async fn update(&self, event: Event) -> Result<()> {
        let mut state = self.state.write().await;
        match state.events.get_mut(&event.id) {
            Some(stored) => {
                *stored = event;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "Event",
                id: event.id.as_i64(),
            }),
        }
    }

    async fn delete(&self, id: EventId) -> Result<bool> {
        Ok(self.state.write().await.events.remove(&id).is_some())
    }
}
