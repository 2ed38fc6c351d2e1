//! Handlers shared by all document collections.

use axum::extract::Path;
use axum::routing::{delete, get};
use axum::{Extension, Json};

use crate::collection::{self, Deleted, Document};
use crate::Result;

use super::extract::Payload;
use super::{blocking, DbExt, Router};

/// Routes listing, creating and deleting documents at the provided path.
pub fn router<T: Document>(path: &str) -> Router {
    Router::new()
        .route(path, get(list::<T>).post(create::<T>))
        .route(&format!("{path}/:id"), delete(remove::<T>))
}

pub async fn list<T: Document>(Extension(db): DbExt) -> Result<Json<Vec<T>>> {
    let documents = blocking(move || collection::list::<T>(&db)).await?;
    Ok(Json(documents))
}

pub async fn create<T: Document>(
    Extension(db): DbExt,
    Payload(input): Payload<T::Input>,
) -> Result<Json<T>> {
    let document = blocking(move || collection::create::<T>(&db, input)).await?;
    Ok(Json(document))
}

pub async fn remove<T: Document>(
    Path(id): Path<String>,
    Extension(db): DbExt,
) -> Result<Json<Deleted>> {
    let deleted = blocking(move || collection::delete::<T>(&db, &id)).await?;
    Ok(Json(deleted))
}
