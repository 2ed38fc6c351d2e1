//! Persistence layer.
//!
//! Backends implement the byte-level [`Store`] trait. Everything above it
//! talks to the typed [`Database`] handle, which encodes documents with `pot`
//! and wraps them in a [`Stored`] envelope carrying the insertion sequence.

mod memory;
#[cfg(feature = "redb")]
mod redb;
#[cfg(feature = "sled")]
mod sled;

use std::fmt::Debug;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config;
use crate::error::{ErrorKind, Result};

pub use self::memory::MemoryDb;
#[cfg(feature = "redb")]
pub use self::redb::ReDb;
#[cfg(feature = "sled")]
pub use self::sled::SledDb;

pub trait Identifiable {
    fn get_id(&self) -> Uuid;
}

pub trait Collectable {
    fn get_collection_name() -> &'static str;
}

/// Byte-level storage adapter.
///
/// Collections are created lazily on first write. Every mutating call is a
/// single durable write; implementations must not buffer.
pub trait Store: Debug + Send + Sync {
    /// Returns all key-value pairs stored in the collection.
    fn scan(&self, collection: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;

    fn get(&self, collection: &str, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Inserts the value, replacing any previous value stored at the key.
    fn insert(&self, collection: &str, key: &[u8], value: Vec<u8>) -> Result<()>;

    /// Removes the entry stored at the key. Returns false if there was none.
    fn remove(&self, collection: &str, key: &[u8]) -> Result<bool>;

    /// Replaces the value at the key only if it's still equal to `current`.
    /// Returns false if the value changed or the entry is gone.
    fn compare_and_swap(
        &self,
        collection: &str,
        key: &[u8],
        current: &[u8],
        new: Vec<u8>,
    ) -> Result<bool>;

    /// Returns the next value of a strictly increasing, store-wide counter.
    fn next_sequence(&self) -> Result<u64>;
}

/// Storage backends selectable through configuration.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Backend {
    Sled,
    Redb,
    Memory,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "sled") {
            Self::Sled
        } else {
            Self::Memory
        }
    }
}

/// Envelope written to the store for every collection document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Stored<T> {
    /// Insertion sequence, used to order documents sharing a timestamp.
    pub sequence: u64,
    pub document: T,
}

#[derive(Clone, Debug)]
pub struct Database {
    inner: Arc<dyn Store>,
}

impl Database {
    /// Opens the backend selected in the configuration.
    pub fn new(config: &config::Db) -> Result<Self> {
        tracing::info!("opening {} database at {}", config.backend, config.path);
        match config.backend {
            #[cfg(feature = "sled")]
            Backend::Sled => Ok(Self::from_store(SledDb::new(&config.path)?)),
            #[cfg(feature = "redb")]
            Backend::Redb => Ok(Self::from_store(ReDb::new(&config.path)?)),
            Backend::Memory => Ok(Self::memory()),
            #[allow(unreachable_patterns)]
            backend => Err(ErrorKind::Misconfigured(format!(
                "database backend '{backend}' not compiled in"
            ))
            .into()),
        }
    }

    /// Creates a fresh database living only in memory.
    pub fn memory() -> Self {
        Self::from_store(MemoryDb::new())
    }

    pub fn from_store(store: impl Store + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Gets all documents from the collection defined for the document type,
    /// together with their insertion sequence. No particular order is
    /// guaranteed.
    pub fn get_collection<T: DeserializeOwned + Collectable>(&self) -> Result<Vec<Stored<T>>> {
        let mut out = Vec::new();
        for (_, value) in self.inner.scan(T::get_collection_name())? {
            out.push(decode(&value)?);
        }
        Ok(out)
    }

    /// Gets a document by id from the collection defined for its type.
    pub fn get<T: DeserializeOwned + Collectable>(&self, id: Uuid) -> Result<Option<T>> {
        match self.inner.get(T::get_collection_name(), id.as_bytes())? {
            Some(bytes) => Ok(Some(decode::<Stored<T>>(&bytes)?.document)),
            None => Ok(None),
        }
    }

    /// Stores a new document, assigning it the next insertion sequence.
    pub fn insert<T: Serialize + Identifiable + Collectable>(&self, value: &T) -> Result<()> {
        let stored = Stored {
            sequence: self.inner.next_sequence()?,
            document: value,
        };
        self.inner.insert(
            T::get_collection_name(),
            value.get_id().as_bytes(),
            encode(&stored)?,
        )
    }

    /// Modifies the document in place. The write only lands if the document
    /// wasn't changed or removed in the meantime, otherwise the modification
    /// is retried on the fresh value.
    ///
    /// Returns `None` if there is no document with the provided id.
    pub fn update<T, F>(&self, id: Uuid, mut modify: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned + Collectable,
        F: FnMut(&mut T),
    {
        let collection = T::get_collection_name();
        loop {
            let current = match self.inner.get(collection, id.as_bytes())? {
                Some(c) => c,
                None => return Ok(None),
            };
            let mut stored: Stored<T> = decode(&current)?;
            modify(&mut stored.document);
            if self
                .inner
                .compare_and_swap(collection, id.as_bytes(), &current, encode(&stored)?)?
            {
                return Ok(Some(stored.document));
            }
            tracing::debug!("concurrent write on {collection}/{id}, retrying update");
        }
    }

    /// Removes the document with the provided id. Returns false if it didn't
    /// exist.
    pub fn remove<T: Collectable>(&self, id: Uuid) -> Result<bool> {
        self.inner.remove(T::get_collection_name(), id.as_bytes())
    }

    /// Gets a value stored under a fixed key rather than a generated id.
    pub fn get_keyed<T: DeserializeOwned>(&self, collection: &str, key: &str) -> Result<Option<T>> {
        match self.inner.get(collection, key.as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Upserts a value under a fixed key.
    pub fn set_keyed<T: Serialize>(&self, collection: &str, key: &str, value: &T) -> Result<()> {
        self.inner
            .insert(collection, key.as_bytes(), encode(value)?)
    }
}

pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let t: T = pot::from_slice(bytes)?;
    Ok(t)
}

pub fn encode<T: serde::Serialize>(item: &T) -> Result<Vec<u8>> {
    let bytes = pot::to_vec(item)?;
    Ok(bytes)
}
