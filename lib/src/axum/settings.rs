use axum::routing::get;
use axum::{Extension, Json};

use crate::settings::{self, Theme};
use crate::Result;

use super::extract::Payload;
use super::{blocking, DbExt, Router};

pub fn router() -> Router {
    Router::new().route("/settings/theme", get(get_theme).put(set_theme))
}

pub async fn get_theme(Extension(db): DbExt) -> Result<Json<Theme>> {
    let theme = blocking(move || settings::get_theme(&db)).await?;
    Ok(Json(Theme { theme }))
}

pub async fn set_theme(
    Extension(db): DbExt,
    Payload(Theme { theme }): Payload<Theme>,
) -> Result<Json<Theme>> {
    let theme = blocking(move || settings::set_theme(&db, theme)).await?;
    Ok(Json(Theme { theme }))
}
