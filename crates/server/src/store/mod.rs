//! Persistence behind a small key-value contract.
//!
//! The services never talk to a backend directly; they go through [`Store`],
//! which owns the key layout and JSON codec, and [`Store`] delegates to a
//! [`KeyValueStore`] chosen once at startup from configuration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::{Room, SavedReport};
use thiserror::Error;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Backend(#[source] anyhow::Error),

    #[error("corrupt record under key {key}: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.into())
    }
}

/// The only primitives the core needs from a persistence backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

const REPORT_INDEX_KEY: &str = "reports:index";

/// Typed facade over the raw key-value backend.
///
/// Rooms are keyed by uppercased code and refreshed to the room TTL on every
/// write; reports and the newest-first report index use the much longer
/// report TTL.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
    room_ttl: Duration,
    report_ttl: Duration,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueStore>, room_ttl: Duration, report_ttl: Duration) -> Self {
        Self {
            backend,
            room_ttl,
            report_ttl,
        }
    }

    fn room_key(code: &str) -> String {
        format!("room:{}", code.to_uppercase())
    }

    fn report_key(id: &str) -> String {
        format!("report:{id}")
    }

    fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StoreError> {
        serde_json::to_string(value).map_err(|source| StoreError::Codec {
            key: key.to_string(),
            source,
        })
    }

    fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StoreError> {
        serde_json::from_str(raw).map_err(|source| StoreError::Codec {
            key: key.to_string(),
            source,
        })
    }

    pub async fn get_room(&self, code: &str) -> Result<Option<Room>, StoreError> {
        let key = Self::room_key(code);
        match self.backend.get(&key).await? {
            Some(raw) => Ok(Some(Self::decode(&key, &raw)?)),
            None => Ok(None),
        }
    }

    pub async fn put_room(&self, room: &Room) -> Result<(), StoreError> {
        let key = Self::room_key(&room.code);
        let raw = Self::encode(&key, room)?;
        self.backend.set(&key, raw, self.room_ttl).await
    }

    pub async fn room_exists(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.backend.get(&Self::room_key(code)).await?.is_some())
    }

    pub async fn get_report(&self, id: &str) -> Result<Option<SavedReport>, StoreError> {
        let key = Self::report_key(id);
        match self.backend.get(&key).await? {
            Some(raw) => Ok(Some(Self::decode(&key, &raw)?)),
            None => Ok(None),
        }
    }

    pub async fn put_report(&self, report: &SavedReport) -> Result<(), StoreError> {
        let key = Self::report_key(&report.id);
        let raw = Self::encode(&key, report)?;
        self.backend.set(&key, raw, self.report_ttl).await
    }

    pub async fn delete_report(&self, id: &str) -> Result<(), StoreError> {
        self.backend.delete(&Self::report_key(id)).await
    }

    /// Report ids, newest first. A missing index reads as empty.
    pub async fn report_index(&self) -> Result<Vec<String>, StoreError> {
        match self.backend.get(REPORT_INDEX_KEY).await? {
            Some(raw) => Self::decode(REPORT_INDEX_KEY, &raw),
            None => Ok(Vec::new()),
        }
    }

    pub async fn put_report_index(&self, ids: &[String]) -> Result<(), StoreError> {
        let raw = Self::encode(REPORT_INDEX_KEY, &ids)?;
        self.backend.set(REPORT_INDEX_KEY, raw, self.report_ttl).await
    }
}
