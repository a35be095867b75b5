use crate::error::StoreError;
use async_trait::async_trait;
use flightcheck_core::{EntryId, ItineraryEntry};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::info;

/// The system of record for itinerary entries.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Persists a new recorded pickup time for one entry.
    async fn persist_pickup_time(&self, id: &EntryId, pickup_time: &str)
        -> Result<(), StoreError>;
}

/// Itinerary entries kept in a JSON array on disk. Every update rewrites
/// the whole file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<Vec<ItineraryEntry>>,
}

impl JsonFileStore {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read(&path).await?;
        let entries: Vec<ItineraryEntry> = serde_json::from_slice(&raw)?;
        info!(path = %path.display(), entries = entries.len(), "loaded itinerary entries");
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub async fn entries(&self) -> Vec<ItineraryEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl ItineraryStore for JsonFileStore {
    async fn persist_pickup_time(
        &self,
        id: &EntryId,
        pickup_time: &str,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().await;
        let mut updated = entries.clone();
        let entry = updated
            .iter_mut()
            .find(|entry| &entry.id == id)
            .ok_or_else(|| StoreError::UnknownEntry(id.clone()))?;
        entry.pickup_time = pickup_time.to_string();

        let json = serde_json::to_vec_pretty(&updated)?;
        tokio::fs::write(&self.path, json).await?;
        *entries = updated;
        info!(entry_id = %id, pickup_time, "persisted pickup time");
        Ok(())
    }
}
