use axum::http::Uri;
use axum::routing::{get, post};
use axum::{Extension, Json};

use crate::auth::{LoginRequest, LoginResponse, Verified};
use crate::Result;

use super::extract::{Payload, TokenQuery};
use super::{blocking, DbExt, GateExt, Router};

pub fn router() -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
}

/// Exchanges the vault password for the session token.
pub async fn login(
    Extension(gate): GateExt,
    Extension(db): DbExt,
    Payload(request): Payload<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let response = blocking(move || gate.login(&request.password, &db)).await?;
    Ok(Json(response))
}

pub async fn verify(Extension(gate): GateExt, uri: Uri) -> Result<Json<Verified>> {
    Ok(Json(gate.verify(&TokenQuery::from_uri(&uri).token)?))
}
