use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::Response;
use axum_auth::AuthBearer;

use crate::auth::Gate;
use crate::error::{Error, ErrorKind};

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: String,
}

impl TokenQuery {
    /// Reads the `token` query parameter. A missing or malformed query
    /// yields an empty token, which never matches.
    pub fn from_uri(uri: &Uri) -> Self {
        Query::<TokenQuery>::try_from_uri(uri)
            .map(|q| q.0)
            .unwrap_or_default()
    }
}

/// Proof that the request carries the session token.
///
/// The token is taken from the `Authorization: Bearer` header, falling back
/// to the `token` query parameter.
#[derive(Clone, Copy, Debug)]
pub struct Session;

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = parts
            .extensions
            .get::<Arc<Gate>>()
            .cloned()
            .ok_or_else(|| ErrorKind::Other("gate extension unavailable".to_string()))?;

        let token = match AuthBearer::from_request_parts(parts, state).await {
            Ok(AuthBearer(token)) => token,
            Err(_) => TokenQuery::from_uri(&parts.uri).token,
        };

        if gate.is_valid(&token) {
            Ok(Session)
        } else {
            tracing::debug!("rejecting request without valid session: {}", parts.uri.path());
            Err(ErrorKind::Unauthorized.into())
        }
    }
}

/// Middleware rejecting requests that don't carry the session token.
pub async fn guard(_session: Session, request: Request, next: Next) -> Response {
    next.run(request).await
}
