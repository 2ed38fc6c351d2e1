use axum::extract::Path;
use axum::routing::{get, patch};
use axum::{Extension, Json};

use crate::todo::{self, Todo, TodoUpdate};
use crate::Result;

use super::collection::{create, list, remove};
use super::extract::Payload;
use super::{blocking, DbExt, Router};

/// Todos get the regular collection routes plus completion updates.
pub fn router() -> Router {
    Router::new()
        .route("/todos", get(list::<Todo>).post(create::<Todo>))
        .route("/todos/:id", patch(update).delete(remove::<Todo>))
}

pub async fn update(
    Path(id): Path<String>,
    Extension(db): DbExt,
    Payload(update): Payload<TodoUpdate>,
) -> Result<Json<Todo>> {
    let todo = blocking(move || todo::set_completed(&db, &id, update)).await?;
    Ok(Json(todo))
}
