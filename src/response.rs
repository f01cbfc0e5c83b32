use crate::Error;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The normalized outcome of a successful exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct Response<T = Value> {
    pub body: Option<T>,
    pub headers: HeaderMap,
    pub status_code: StatusCode,
}

impl Response {
    /// Re-types the body. A body that does not fit `T` is a `ServerError`.
    pub fn json<T>(self) -> Result<Response<T>, Error>
    where
        T: DeserializeOwned,
    {
        let Self {
            body,
            headers,
            status_code,
        } = self;
        let body = body
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| {
                tracing::warn!(error = %e, "response body does not match the expected type");
                Error::server_error()
            })?;
        Ok(Response {
            body,
            headers,
            status_code,
        })
    }
}
