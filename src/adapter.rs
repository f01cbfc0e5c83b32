pub mod dispatch;
pub mod fetch;


use crate::Error;
use tower::BoxError;

/// Classifies a failure raised by a transport. A typed [`Error`] carried by the
/// transport is returned as is; anything else collapses into `ServerError`.
fn recover<E>(error: E) -> Error
where
    E: Into<BoxError>,
{
    match error.into().downcast::<Error>() {
        Ok(e) => *e,
        Err(e) => {
            tracing::warn!(error = %e, "transport failed");
            Error::server_error()
        }
    }
}

fn invalid_request(error: http::Error) -> Error {
    tracing::warn!(error = %error, "request could not be built");
    Error::server_error()
}
