//! Generic document collection.
//!
//! Every content collection (gallery, achievements, todos, tribute) shares
//! the same contract: documents get a server-generated id and creation
//! timestamp, are listed newest first and are deleted by id. The operations
//! here are written once against the [`Document`] trait.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::db::{Collectable, Identifiable};
use crate::error::{Error, ErrorKind, Result};
use crate::Database;

pub trait Document:
    Serialize + DeserializeOwned + Collectable + Identifiable + Send + Sync + 'static
{
    /// Caller-provided part of the document.
    type Input: DeserializeOwned + Send + 'static;

    /// Human readable name of a single document, used in error messages.
    const NAME: &'static str;

    fn from_input(input: Self::Input, id: Uuid, timestamp: DateTime<Utc>) -> Self;

    fn timestamp(&self) -> DateTime<Utc>;
}

/// Response body for successful deletion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deleted {
    pub success: bool,
}

/// Lists all documents, newest first. Documents sharing a timestamp are
/// ordered by insertion, the later one first.
pub fn list<T: Document>(db: &Database) -> Result<Vec<T>> {
    let mut stored = db.get_collection::<T>()?;
    stored.sort_by(|a, b| {
        b.document
            .timestamp()
            .cmp(&a.document.timestamp())
            .then(b.sequence.cmp(&a.sequence))
    });
    Ok(stored.into_iter().map(|s| s.document).collect())
}

/// Creates and stores a new document, assigning it a fresh id and the
/// current time.
pub fn create<T: Document>(db: &Database, input: T::Input) -> Result<T> {
    let document = T::from_input(input, Uuid::new_v4(), Utc::now());
    db.insert(&document)?;
    tracing::debug!(
        "created {} {} in {}",
        T::NAME,
        document.get_id(),
        T::get_collection_name()
    );
    Ok(document)
}

/// Deletes the document with the provided id.
pub fn delete<T: Document>(db: &Database, id: &str) -> Result<Deleted> {
    let uuid = parse_id::<T>(id)?;
    if !db.remove::<T>(uuid)? {
        return Err(not_found::<T>(id));
    }
    tracing::debug!("deleted {} {} from {}", T::NAME, uuid, T::get_collection_name());
    Ok(Deleted { success: true })
}

/// Applies the modification to the stored document and returns the result.
pub fn update<T, F>(db: &Database, id: &str, modify: F) -> Result<T>
where
    T: Document,
    F: FnMut(&mut T),
{
    let uuid = parse_id::<T>(id)?;
    db.update::<T, F>(uuid, modify)?
        .ok_or_else(|| not_found::<T>(id))
}

/// Ids are always uuids, so anything that doesn't parse can't exist.
fn parse_id<T: Document>(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id).map_err(|_| not_found::<T>(id))
}

fn not_found<T: Document>(id: &str) -> Error {
    ErrorKind::NotFound(format!("{} '{}'", T::NAME, id)).into()
}
