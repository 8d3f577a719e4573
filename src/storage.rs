use async_trait::async_trait;
use sql_middleware::middleware::ConfigAndPool;
use std::error::Error;
use std::fmt;

use crate::model::course::EventConfig;
use crate::model::database::{
    get_event_config, get_guests, get_selected_members, load_tee_sheet_from_db,
    store_tee_sheet_in_db,
};
use crate::model::roster::{GuestRecord, MemberRecord};
use crate::model::types::StoredTeeSheet;

#[derive(Debug, Clone)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for StorageError {}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// The persistence collaborator. The engine owns the in-memory sheet; whatever
/// sits behind this trait owns the durable copy.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_event_config(&self, event_id: i64) -> Result<EventConfig, StorageError>;
    async fn get_members(&self, event_id: i64) -> Result<Vec<MemberRecord>, StorageError>;
    async fn get_guests(&self, event_id: i64) -> Result<Vec<GuestRecord>, StorageError>;
    async fn store_tee_sheet(
        &self,
        event_id: i64,
        sheet: &StoredTeeSheet,
    ) -> Result<(), StorageError>;
    async fn load_tee_sheet(&self, event_id: i64) -> Result<Option<StoredTeeSheet>, StorageError>;
}

#[derive(Clone)]
pub struct SqlStorage {
    config_and_pool: ConfigAndPool,
}

impl SqlStorage {
    #[must_use]
    pub fn new(config_and_pool: ConfigAndPool) -> Self {
        Self { config_and_pool }
    }

    #[must_use]
    pub fn config_and_pool(&self) -> &ConfigAndPool {
        &self.config_and_pool
    }
}

#[async_trait]
impl Storage for SqlStorage {
    async fn get_event_config(&self, event_id: i64) -> Result<EventConfig, StorageError> {
        get_event_config(&self.config_and_pool, event_id)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }

    async fn get_members(&self, event_id: i64) -> Result<Vec<MemberRecord>, StorageError> {
        get_selected_members(&self.config_and_pool, event_id)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }

    async fn get_guests(&self, event_id: i64) -> Result<Vec<GuestRecord>, StorageError> {
        get_guests(&self.config_and_pool, event_id)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }

    async fn store_tee_sheet(
        &self,
        event_id: i64,
        sheet: &StoredTeeSheet,
    ) -> Result<(), StorageError> {
        store_tee_sheet_in_db(&self.config_and_pool, event_id, sheet)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }

    async fn load_tee_sheet(&self, event_id: i64) -> Result<Option<StoredTeeSheet>, StorageError> {
        load_tee_sheet_from_db(&self.config_and_pool, event_id)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }
}
