//! redb-based local store for settings and stored-bill links
//!
//! Survives restarts. Three tables:
//! - `settings`: fixed key -> JSON value (surcharge rates, dashboard filter, auth token)
//! - `stored_orders`: order_id -> stored-at (unix millis)
//! - `share_links`: order_id -> JSON [`StoredBillLink`]

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Serialize, de::DeserializeOwned};
use shared::StoredBillLink;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

const STORED_ORDERS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("stored_orders");

const SHARE_LINKS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("share_links");

/// Setting keys
pub const KEY_SURCHARGE_RATES: &str = "surcharge_rates";
pub const KEY_DASHBOARD_FILTER: &str = "dashboard_filter";
pub const KEY_AUTH_TOKEN: &str = "auth_token";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone)]
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    /// In-memory database whose writes fail while the returned flag is set
    #[cfg(test)]
    pub(crate) fn open_flaky() -> StoreResult<(Self, Arc<std::sync::atomic::AtomicBool>)> {
        let backend = test_support::FlakyBackend::default();
        let fail_writes = backend.fail_writes.clone();
        let db = Database::builder().create_with_backend(backend)?;
        Ok((Self::init(db)?, fail_writes))
    }

    fn init(db: Database) -> StoreResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
            let _ = write_txn.open_table(STORED_ORDERS_TABLE)?;
            let _ = write_txn.open_table(SHARE_LINKS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Settings ==========

    pub fn get_setting<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;

        match table.get(key)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Insert or replace a setting
    pub fn put_setting<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.insert(key, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Returns true if the key existed
    pub fn remove_setting(&self, key: &str) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(SETTINGS_TABLE)?;
            table.remove(key)?.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }

    // ========== Stored bills ==========

    /// Record a stored bill: link cache and stored flag in one transaction
    pub fn record_stored_bill(&self, order_id: &str, link: &StoredBillLink) -> StoreResult<()> {
        let bytes = serde_json::to_vec(link)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut links = write_txn.open_table(SHARE_LINKS_TABLE)?;
            links.insert(order_id, bytes.as_slice())?;

            let mut stored = write_txn.open_table(STORED_ORDERS_TABLE)?;
            stored.insert(order_id, link.stored_at)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn share_link(&self, order_id: &str) -> StoreResult<Option<StoredBillLink>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SHARE_LINKS_TABLE)?;

        match table.get(order_id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// When the order's bill was stored (unix millis)
    pub fn stored_at(&self, order_id: &str) -> StoreResult<Option<i64>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STORED_ORDERS_TABLE)?;
        Ok(table.get(order_id)?.map(|guard| guard.value()))
    }

    pub fn is_stored(&self, order_id: &str) -> StoreResult<bool> {
        Ok(self.stored_at(order_id)?.is_some())
    }

}


#[cfg(test)]
mod tests {
    use super::*;
    use shared::{DashboardFilter, SurchargeRates};

    fn link(url: &str, stored_at: i64) -> StoredBillLink {
        StoredBillLink {
            url: url.to_string(),
            public_id: "bills/abc".to_string(),
            stored_at,
        }
    }

    #[test]
    fn test_settings_roundtrip() {
        let store = LocalStore::open_in_memory().unwrap();
        assert_eq!(
            store.get_setting::<SurchargeRates>(KEY_SURCHARGE_RATES).unwrap(),
            None
        );

        let rates = SurchargeRates::new(5.0, 18.0, 0.0, 10.0).unwrap();
        store.put_setting(KEY_SURCHARGE_RATES, &rates).unwrap();
        assert_eq!(store.get_setting(KEY_SURCHARGE_RATES).unwrap(), Some(rates));

        // Updated in place
        let updated = SurchargeRates::new(2.5, 0.0, 0.0, 0.0).unwrap();
        store.put_setting(KEY_SURCHARGE_RATES, &updated).unwrap();
        assert_eq!(store.get_setting(KEY_SURCHARGE_RATES).unwrap(), Some(updated));
    }

    #[test]
    fn test_remove_setting() {
        let store = LocalStore::open_in_memory().unwrap();
        store.put_setting(KEY_DASHBOARD_FILTER, &DashboardFilter::Month).unwrap();

        assert!(store.remove_setting(KEY_DASHBOARD_FILTER).unwrap());
        assert!(!store.remove_setting(KEY_DASHBOARD_FILTER).unwrap());
        assert_eq!(
            store.get_setting::<DashboardFilter>(KEY_DASHBOARD_FILTER).unwrap(),
            None
        );
    }

    #[test]
    fn test_record_stored_bill() {
        let store = LocalStore::open_in_memory().unwrap();
        assert!(!store.is_stored("ORD-42").unwrap());
        assert_eq!(store.share_link("ORD-42").unwrap(), None);

        store
            .record_stored_bill("ORD-42", &link("https://cdn/a.html", 1_000))
            .unwrap();

        assert!(store.is_stored("ORD-42").unwrap());
        assert_eq!(store.stored_at("ORD-42").unwrap(), Some(1_000));
        assert_eq!(
            store.share_link("ORD-42").unwrap().map(|l| l.url),
            Some("https://cdn/a.html".to_string())
        );
        assert!(!store.is_stored("ORD-43").unwrap());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bill_desk.redb");

        {
            let store = LocalStore::open(&path).unwrap();
            store.put_setting(KEY_AUTH_TOKEN, &"token-1").unwrap();
            store.record_stored_bill("ORD-7", &link("x", 5)).unwrap();
        }

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(
            store.get_setting::<String>(KEY_AUTH_TOKEN).unwrap().as_deref(),
            Some("token-1")
        );
        assert!(store.is_stored("ORD-7").unwrap());
    }
}
