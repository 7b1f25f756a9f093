//! Subscriber persistence using redb.
//!
//! One table, key = user id, value = subscription status. Re-adding an
//! id overwrites the same record, so subscription is idempotent.

use std::path::Path;

use craftbell_core::dispatch::SubscriberStore;
use craftbell_core::error::{BotError, Result};
use redb::{Database, ReadableTable, TableDefinition};

const SUBSCRIBERS: TableDefinition<&str, &str> = TableDefinition::new("subscribers");

const STATUS_ACTIVE: &str = "active";

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create the redb database at `path`.
    ///
    /// Creates the `SUBSCRIBERS` table if it doesn't already exist.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(|e| BotError::Store(e.to_string()))?;
        // Ensure the table exists before any reads
        let wt = db
            .begin_write()
            .map_err(|e| BotError::Store(e.to_string()))?;
        wt.open_table(SUBSCRIBERS)
            .map_err(|e| BotError::Store(e.to_string()))?;
        wt.commit().map_err(|e| BotError::Store(e.to_string()))?;
        Ok(Self { db })
    }
}

impl SubscriberStore for RedbStore {
    fn add(&self, id: &str) -> Result<()> {
        let wt = self
            .db
            .begin_write()
            .map_err(|e| BotError::Store(e.to_string()))?;
        {
            let mut table = wt
                .open_table(SUBSCRIBERS)
                .map_err(|e| BotError::Store(e.to_string()))?;
            table
                .insert(id, STATUS_ACTIVE)
                .map_err(|e| BotError::Store(e.to_string()))?;
        }
        wt.commit().map_err(|e| BotError::Store(e.to_string()))?;
        Ok(())
    }

    /// All subscriber ids, keys only.
    fn list_all(&self) -> Result<Vec<String>> {
        let rt = self
            .db
            .begin_read()
            .map_err(|e| BotError::Store(e.to_string()))?;
        let table = rt
            .open_table(SUBSCRIBERS)
            .map_err(|e| BotError::Store(e.to_string()))?;
        let mut ids = Vec::new();
        for entry in table.iter().map_err(|e| BotError::Store(e.to_string()))? {
            let (key, _) = entry.map_err(|e| BotError::Store(e.to_string()))?;
            ids.push(key.value().to_string());
        }
        Ok(ids)
    }
}
