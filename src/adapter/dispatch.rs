//! Adapter over a configurable request-library transport.
//!
//! The transport receives a [`RequestConfig`] with the body already serialized,
//! parses response bodies itself and reports HTTP failures as a [`Rejection`]
//! that may carry the [`Reply`].

use crate::{Error, HttpClient, Method, Request, Response};
use futures::future::BoxFuture;
use futures::FutureExt;
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use tower::{BoxError, Service, ServiceExt};
use tracing::Instrument;

#[derive(Clone, Debug, PartialEq)]
pub struct RequestConfig {
    pub url: String,
    pub method: Method,
    pub data: Option<String>,
    pub headers: HeaderMap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub data: Option<Value>,
    pub headers: HeaderMap,
    /// URL the transport reports for the exchange, if any.
    pub url: Option<String>,
}

/// Failure raised by a request-library transport.
///
/// `response` is present when the server answered with a status the transport
/// does not accept, and absent for failures below HTTP (connect, TLS, I/O).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Rejection {
    pub message: String,
    pub response: Option<Reply>,
    #[source]
    pub source: Option<BoxError>,
}

impl Rejection {
    pub fn status(reply: Reply) -> Self {
        Self {
            message: format!("Request failed with status code {}", reply.status.as_u16()),
            response: Some(reply),
            source: None,
        }
    }

    pub fn network<E>(source: E) -> Self
    where
        E: Into<BoxError>,
    {
        let source = source.into();
        Self {
            message: source.to_string(),
            response: None,
            source: Some(source),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Adapter<S> {
    service: S,
}

impl<S> Adapter<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn into_inner(self) -> S {
        self.service
    }
}

impl<S> HttpClient for Adapter<S>
where
    S: Service<RequestConfig, Response = Reply> + Clone + Send + Sync + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
{
    fn request(&self, request: Request) -> BoxFuture<'_, Result<Response, Error>> {
        let span = tracing::debug_span!("dispatch", method = %request.method, url = %request.url);
        let service = self.service.clone();
        async move {
            let config = RequestConfig {
                headers: request.header_map().map_err(super::invalid_request)?,
                data: request.transmitted_body(),
                method: request.method,
                url: request.url.clone(),
            };
            tracing::debug!("sending request");
            match service.oneshot(config).await {
                Ok(reply) => {
                    tracing::debug!(status = %reply.status, "received response");
                    Ok(Response {
                        body: if reply.status == StatusCode::NO_CONTENT {
                            None
                        } else {
                            reply.data
                        },
                        headers: reply.headers,
                        status_code: reply.status,
                    })
                }
                Err(e) => Err(reject(e.into(), request.url)),
            }
        }
        .instrument(span)
        .boxed()
    }
}

fn reject(error: BoxError, url: String) -> Error {
    let error = match error.downcast::<Error>() {
        Ok(e) => return *e,
        Err(e) => e,
    };
    match error.downcast::<Rejection>() {
        Ok(rejection) => match rejection.response {
            Some(reply) => {
                tracing::debug!(status = %reply.status, "transport rejected response");
                Error::from_status(reply.status, reply.data, reply.url.unwrap_or(url))
            }
            None => super::recover(rejection),
        },
        Err(e) => super::recover(e),
    }
}
