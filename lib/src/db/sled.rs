use std::path::Path;

use crate::Result;

use super::Store;

#[derive(Clone, Debug)]
pub struct SledDb {
    inner: sled::Db,
}

impl SledDb {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let inner = sled::Config::default().path(path).open()?;
        Ok(Self { inner })
    }

    /// Opens a database that is removed from disk once dropped.
    pub fn temporary() -> Result<Self> {
        let inner = sled::Config::new().temporary(true).open()?;
        Ok(Self { inner })
    }

    pub fn collections(&self) -> Vec<String> {
        self.inner
            .tree_names()
            .into_iter()
            .map(|s| String::from_utf8_lossy(&s).into_owned())
            .collect()
    }
}

impl Store for SledDb {
    fn scan(&self, collection: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let tree = self.inner.open_tree(collection)?;
        let mut out = Vec::new();
        for entry in tree.iter() {
            let (key, value) = entry?;
            out.push((key.to_vec(), value.to_vec()));
        }
        Ok(out)
    }

    fn get(&self, collection: &str, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let tree = self.inner.open_tree(collection)?;
        Ok(tree.get(key)?.map(|v| v.to_vec()))
    }

    fn insert(&self, collection: &str, key: &[u8], value: Vec<u8>) -> Result<()> {
        let tree = self.inner.open_tree(collection)?;
        tree.insert(key, value)?;
        tree.flush()?;
        Ok(())
    }

    fn remove(&self, collection: &str, key: &[u8]) -> Result<bool> {
        let tree = self.inner.open_tree(collection)?;
        let removed = tree.remove(key)?.is_some();
        tree.flush()?;
        Ok(removed)
    }

    fn compare_and_swap(
        &self,
        collection: &str,
        key: &[u8],
        current: &[u8],
        new: Vec<u8>,
    ) -> Result<bool> {
        let tree = self.inner.open_tree(collection)?;
        let swapped = tree
            .compare_and_swap(key, Some(current), Some(new))?
            .is_ok();
        tree.flush()?;
        Ok(swapped)
    }

    fn next_sequence(&self) -> Result<u64> {
        Ok(self.inner.generate_id()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_are_visible_to_clones() {
        let db = SledDb::temporary().unwrap();
        let other = db.clone();
        db.insert("gallery", b"k", b"v".to_vec()).unwrap();

        assert_eq!(other.get("gallery", b"k").unwrap(), Some(b"v".to_vec()));
        assert!(other.collections().contains(&"gallery".to_string()));
    }

    #[test]
    fn sequence_is_strictly_increasing() {
        let db = SledDb::temporary().unwrap();
        let a = db.next_sequence().unwrap();
        let b = db.next_sequence().unwrap();
        assert!(b > a);
    }

    #[test]
    fn compare_and_swap_on_missing_key_fails() {
        let db = SledDb::temporary().unwrap();
        assert!(!db
            .compare_and_swap("todos", b"k", b"old", b"new".to_vec())
            .unwrap());
        assert!(db.get("todos", b"k").unwrap().is_none());
    }
}
