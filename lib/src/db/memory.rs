//! Volatile storage, mostly useful for tests and throwaway instances.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ErrorKind, Result};

use super::Store;

type Collections = HashMap<String, BTreeMap<Vec<u8>, Vec<u8>>>;

#[derive(Debug, Default)]
pub struct MemoryDb {
    collections: RwLock<Collections>,
    sequence: AtomicU64,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|e| ErrorKind::DbError(format!("memory store poisoned: {e}")).into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|e| ErrorKind::DbError(format!("memory store poisoned: {e}")).into())
    }
}

impl Store for MemoryDb {
    fn scan(&self, collection: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        Ok(self
            .read()?
            .get(collection)
            .map(|c| c.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    fn get(&self, collection: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|c| c.get(key))
            .cloned())
    }

    fn insert(&self, collection: &str, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_vec(), value);
        Ok(())
    }

    fn remove(&self, collection: &str, key: &[u8]) -> Result<bool> {
        Ok(self
            .write()?
            .get_mut(collection)
            .and_then(|c| c.remove(key))
            .is_some())
    }

    fn compare_and_swap(
        &self,
        collection: &str,
        key: &[u8],
        current: &[u8],
        new: Vec<u8>,
    ) -> Result<bool> {
        let mut collections = self.write()?;
        match collections.get_mut(collection).and_then(|c| c.get_mut(key)) {
            Some(value) if value.as_slice() == current => {
                *value = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn next_sequence(&self) -> Result<u64> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_and_swap_requires_matching_value() {
        let store = MemoryDb::new();
        store.insert("c", b"k", b"one".to_vec()).unwrap();

        assert!(!store
            .compare_and_swap("c", b"k", b"other", b"two".to_vec())
            .unwrap());
        assert!(store
            .compare_and_swap("c", b"k", b"one", b"two".to_vec())
            .unwrap());
        assert_eq!(store.get("c", b"k").unwrap().unwrap(), b"two".to_vec());
    }

    #[test]
    fn compare_and_swap_does_not_recreate_removed_entries() {
        let store = MemoryDb::new();
        store.insert("c", b"k", b"one".to_vec()).unwrap();
        assert!(store.remove("c", b"k").unwrap());

        assert!(!store
            .compare_and_swap("c", b"k", b"one", b"two".to_vec())
            .unwrap());
        assert!(store.get("c", b"k").unwrap().is_none());
    }

    #[test]
    fn collections_are_independent() {
        let store = MemoryDb::new();
        store.insert("a", b"k", b"1".to_vec()).unwrap();
        store.insert("b", b"k", b"2".to_vec()).unwrap();
        assert!(store.remove("a", b"k").unwrap());

        assert!(store.scan("a").unwrap().is_empty());
        assert_eq!(store.get("b", b"k").unwrap(), Some(b"2".to_vec()));
    }
}
