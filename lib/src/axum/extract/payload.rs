use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use http::StatusCode;

use crate::error::{Error, ErrorKind};

/// Json body extractor reporting malformed input as a validation error.
///
/// Missing required fields, wrong field types, broken json and a missing
/// content type all end up as `422`. Bodies over the configured limit are
/// rejected with `413`.
pub struct Payload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Payload(value)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(ErrorKind::PayloadTooLarge.into())
            }
            Err(rejection) => Err(ErrorKind::Validation(rejection.body_text()).into()),
        }
    }
}
