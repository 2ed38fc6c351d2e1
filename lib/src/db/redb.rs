//! Database storage based on `redb`.
//!
//! `redb` design document: https://github.com/cberner/redb/blob/master/docs/design.md

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition, TableError};

use crate::Result;

use super::Store;

const SEQUENCE: TableDefinition<&str, u64> = TableDefinition::new("__sequence");

fn table(collection: &str) -> TableDefinition<'_, &'static [u8], &'static [u8]> {
    TableDefinition::new(collection)
}

#[derive(Clone, Debug)]
pub struct ReDb {
    db: Arc<Database>,
}

impl ReDb {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path).map_err(redb::Error::from)?;
        Ok(Self { db: Arc::new(db) })
    }
}

impl Store for ReDb {
    fn scan(&self, collection: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let rx = self.db.begin_read().map_err(redb::Error::from)?;
        let table = match rx.open_table(table(collection)) {
            Ok(t) => t,
            // collections only come into existence on first write
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(redb::Error::from(e).into()),
        };
        let mut out = Vec::new();
        for entry in table.iter().map_err(redb::Error::from)? {
            let (key, value) = entry.map_err(redb::Error::from)?;
            out.push((key.value().to_vec(), value.value().to_vec()));
        }
        Ok(out)
    }

    fn get(&self, collection: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let rx = self.db.begin_read().map_err(redb::Error::from)?;
        let table = match rx.open_table(table(collection)) {
            Ok(t) => t,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(redb::Error::from(e).into()),
        };
        let value = table.get(key).map_err(redb::Error::from)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn insert(&self, collection: &str, key: &[u8], value: Vec<u8>) -> Result<()> {
        let wx = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = wx.open_table(table(collection)).map_err(redb::Error::from)?;
            table
                .insert(key, value.as_slice())
                .map_err(redb::Error::from)?;
        }
        wx.commit().map_err(redb::Error::from)?;
        Ok(())
    }

    fn remove(&self, collection: &str, key: &[u8]) -> Result<bool> {
        let wx = self.db.begin_write().map_err(redb::Error::from)?;
        let removed = {
            let mut table = wx.open_table(table(collection)).map_err(redb::Error::from)?;
            let removed = table.remove(key).map_err(redb::Error::from)?.is_some();
            removed
        };
        wx.commit().map_err(redb::Error::from)?;
        Ok(removed)
    }

    fn compare_and_swap(
        &self,
        collection: &str,
        key: &[u8],
        current: &[u8],
        new: Vec<u8>,
    ) -> Result<bool> {
        // write transactions are serialized, so the check and the write can't
        // interleave with another writer
        let wx = self.db.begin_write().map_err(redb::Error::from)?;
        let swapped = {
            let mut table = wx.open_table(table(collection)).map_err(redb::Error::from)?;
            let matches = match table.get(key).map_err(redb::Error::from)? {
                Some(value) => value.value() == current,
                None => false,
            };
            if matches {
                table
                    .insert(key, new.as_slice())
                    .map_err(redb::Error::from)?;
            }
            matches
        };
        wx.commit().map_err(redb::Error::from)?;
        Ok(swapped)
    }

    fn next_sequence(&self) -> Result<u64> {
        let wx = self.db.begin_write().map_err(redb::Error::from)?;
        let next = {
            let mut table = wx.open_table(SEQUENCE).map_err(redb::Error::from)?;
            let next = table
                .get("documents")
                .map_err(redb::Error::from)?
                .map(|v| v.value() + 1)
                .unwrap_or(0);
            table
                .insert("documents", next)
                .map_err(redb::Error::from)?;
            next
        };
        wx.commit().map_err(redb::Error::from)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    /// Database file location in the system temp dir, removed once dropped.
    struct TempPath(PathBuf);

    impl TempPath {
        fn new() -> Self {
            Self(std::env::temp_dir().join(format!("keepsake-{}.redb", uuid::Uuid::new_v4())))
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn missing_collections_read_as_empty() {
        let path = TempPath::new();
        let db = ReDb::new(&path.0).unwrap();
        assert!(db.scan("gallery").unwrap().is_empty());
        assert!(db.get("gallery", b"k").unwrap().is_none());
        assert!(!db.remove("gallery", b"k").unwrap());
    }

    #[test]
    fn writes_are_visible_to_clones() {
        let path = TempPath::new();
        let db = ReDb::new(&path.0).unwrap();
        let other = db.clone();
        db.insert("gallery", b"k", b"v".to_vec()).unwrap();

        assert_eq!(other.get("gallery", b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(other.scan("gallery").unwrap().len(), 1);
        assert!(other.scan("todos").unwrap().is_empty());
    }

    #[test]
    fn sequence_is_strictly_increasing() {
        let path = TempPath::new();
        let db = ReDb::new(&path.0).unwrap();
        let a = db.next_sequence().unwrap();
        let b = db.next_sequence().unwrap();
        let c = db.next_sequence().unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn data_and_sequence_survive_reopening() {
        let path = TempPath::new();
        let db = ReDb::new(&path.0).unwrap();
        db.insert("todos", b"k", b"v".to_vec()).unwrap();
        let before = db.next_sequence().unwrap();
        drop(db);

        let db = ReDb::new(&path.0).unwrap();
        assert_eq!(db.get("todos", b"k").unwrap(), Some(b"v".to_vec()));
        assert!(db.next_sequence().unwrap() > before);
    }

    #[test]
    fn compare_and_swap_requires_matching_value() {
        let path = TempPath::new();
        let db = ReDb::new(&path.0).unwrap();
        db.insert("todos", b"k", b"one".to_vec()).unwrap();

        assert!(!db
            .compare_and_swap("todos", b"k", b"other", b"two".to_vec())
            .unwrap());
        assert!(db
            .compare_and_swap("todos", b"k", b"one", b"two".to_vec())
            .unwrap());
        assert_eq!(db.get("todos", b"k").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn compare_and_swap_on_missing_entries_fails() {
        let path = TempPath::new();
        let db = ReDb::new(&path.0).unwrap();
        assert!(!db
            .compare_and_swap("todos", b"k", b"one", b"two".to_vec())
            .unwrap());

        db.insert("todos", b"k", b"one".to_vec()).unwrap();
        assert!(db.remove("todos", b"k").unwrap());
        assert!(!db
            .compare_and_swap("todos", b"k", b"one", b"two".to_vec())
            .unwrap());
        assert!(db.get("todos", b"k").unwrap().is_none());
    }
}
