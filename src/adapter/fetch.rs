//! Adapter over a fetch-style transport: any `tower::Service` that exchanges
//! `http::Request`s for streamed `http::Response`s.
//!
//! The body of every response is collected and decoded here. A body whose
//! `content-type` contains `application/json` is parsed as JSON, any other
//! non-empty body is kept as text, and an empty body decodes to `None`.
//!
//! A 404 reports the URI the transport last requested (the `RequestUri`
//! extension set by `tower_http`'s redirect layer) and falls back to the URL
//! the caller asked for.

use crate::{Error, HttpClient, Request, Response};
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use serde_json::Value;
use tower::{BoxError, Service, ServiceExt};
use tower_http::follow_redirect::RequestUri;
use tracing::Instrument;

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

impl<S, B> HttpClient for Adapter<S>
where
    S: Service<http::Request<Full<Bytes>>, Response = http::Response<B>>
        + Clone
        + Send
        + Sync
        + 'static,
    S::Error: Into<BoxError>,
    S::Future: Send,
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    fn request(&self, request: Request) -> BoxFuture<'_, Result<Response, Error>> {
        let span = tracing::debug_span!("fetch", method = %request.method, url = %request.url);
        let service = self.service.clone();
        async move {
            let outgoing = build(&request).map_err(super::invalid_request)?;
            tracing::debug!("sending request");
            let response = service.oneshot(outgoing).await.map_err(super::recover)?;
            tracing::debug!(status = %response.status(), "received response");
            handle(response, request.url).await
        }
        .instrument(span)
        .boxed()
    }
}

fn build(request: &Request) -> Result<http::Request<Full<Bytes>>, http::Error> {
    let body = request
        .transmitted_body()
        .map(Bytes::from)
        .unwrap_or_default();
    let mut outgoing = http::Request::builder()
        .method(http::Method::from(request.method))
        .uri(request.url.as_str())
        .body(Full::new(body))?;
    *outgoing.headers_mut() = request.header_map()?;
    Ok(outgoing)
}

async fn handle<B>(response: http::Response<B>, url: String) -> Result<Response, Error>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let (parts, body) = response.into_parts();
    let body = body.collect().await.map_err(super::recover)?.to_bytes();
    let body = decode(&parts.headers, &body)?;

    if parts.status.is_success() {
        return Ok(Response {
            body: if parts.status == StatusCode::NO_CONTENT {
                None
            } else {
                body
            },
            headers: parts.headers,
            status_code: parts.status,
        });
    }

    let url = match parts.extensions.get::<RequestUri>() {
        Some(RequestUri(resolved)) => resolved.to_string(),
        None => url,
    };
    Err(Error::from_status(parts.status, body, url))
}

fn decode(headers: &HeaderMap, body: &Bytes) -> Result<Option<Value>, Error> {
    if body.is_empty() {
        return Ok(None);
    }

    let json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"));
    if json {
        match serde_json::from_slice(body) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(error = %e, "response body is not valid JSON");
                Err(Error::server_error())
            }
        }
    } else {
        Ok(Some(Value::String(String::from_utf8_lossy(body).into_owned())))
    }
}
