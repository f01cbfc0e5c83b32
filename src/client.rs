use crate::{Error, Request, Response};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// One request in, one normalized response or typed error out.
///
/// Implemented by every adapter, so callers can hold an
/// `Arc<dyn HttpClient>` without knowing which transport is behind it.
pub trait HttpClient: Send + Sync {
    fn request(&self, request: Request) -> BoxFuture<'_, Result<Response, Error>>;
}

impl<C> HttpClient for Arc<C>
where
    C: HttpClient + ?Sized,
{
    fn request(&self, request: Request) -> BoxFuture<'_, Result<Response, Error>> {
        (**self).request(request)
    }
}

pub trait HttpClientExt: HttpClient {
    /// Like [`HttpClient::request`], with the body deserialized into `T`.
    fn request_as<T>(&self, request: Request) -> BoxFuture<'_, Result<Response<T>, Error>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.request(request)
            .map(|response| response?.json::<T>())
            .boxed()
    }
}

impl<C> HttpClientExt for C where C: HttpClient + ?Sized {}
