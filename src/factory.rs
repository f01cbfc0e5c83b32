use crate::{Config, HttpClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(Box<figment::Error>),
    #[cfg(feature = "hyper")]
    #[error(transparent)]
    Tls(rustls::Error),
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Reqwest(reqwest::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Fetch,
    Dispatch,
}

/// Hands out one shared client per adapter kind.
///
/// A client is built on the first call for its kind and every later call
/// returns the same instance.
#[derive(Default)]
pub struct HttpClientFactory {
    config: Config,
    instances: Mutex<HashMap<AdapterKind, Arc<dyn HttpClient>>>,
}

impl HttpClientFactory {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            instances: Mutex::default(),
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        let config = Config::from_env().map_err(|e| Error::Config(Box::new(e)))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves `url` against `base` when it is relative.
    pub fn url(url: &str, base: Option<&str>) -> Result<Url, url::ParseError> {
        match base {
            Some(base) => Url::parse(base)?.join(url),
            None => Url::parse(url),
        }
    }

    /// Fetch-style client over a hyper connection pool with rustls. Redirects
    /// are followed.
    #[cfg(feature = "hyper")]
    pub fn fetch(&self) -> Result<Arc<dyn HttpClient>, Error> {
        self.get_or_try_insert(AdapterKind::Fetch, || {
            let service = hyper::client(&self.config)?;
            Ok(Arc::new(crate::adapter::fetch::Adapter::new(service)))
        })
    }

    /// Request-library client over [`reqwest::Client`].
    #[cfg(feature = "reqwest")]
    pub fn dispatch(&self) -> Result<Arc<dyn HttpClient>, Error> {
        self.get_or_try_insert(AdapterKind::Dispatch, || {
            let mut builder = reqwest::Client::builder().https_only(self.config.https_only);
            if let Some(user_agent) = &self.config.user_agent {
                builder = builder.user_agent(user_agent);
            }
            let client = builder.build().map_err(Error::Reqwest)?;
            Ok(Arc::new(crate::adapter::dispatch::Adapter::new(
                crate::transport::reqwest::Service::new(client),
            )))
        })
    }

    #[cfg(any(feature = "hyper", feature = "reqwest"))]
    fn get_or_try_insert<F>(
        &self,
        kind: AdapterKind,
        make: F,
    ) -> Result<Arc<dyn HttpClient>, Error>
    where
        F: FnOnce() -> Result<Arc<dyn HttpClient>, Error>,
    {
        let mut instances = self.instances.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = instances.get(&kind) {
            return Ok(client.clone());
        }
        let client = make()?;
        tracing::debug!(?kind, "built http client");
        instances.insert(kind, client.clone());
        Ok(client)
    }
}

#[cfg(feature = "hyper")]
mod hyper {
    use super::Error;
    use crate::Config;
    use bytes::Bytes;
    use http_body_util::Full;
    use hyper_rustls::ConfigBuilderExt;
    use hyper_util::client::legacy::connect::HttpConnector;
    use hyper_util::client::legacy::Client;
    use hyper_util::rt::TokioExecutor;
    use std::sync::Arc;
    use tower::ServiceBuilder;
    use tower_http::follow_redirect::{FollowRedirect, FollowRedirectLayer};

    pub(super) type Connector = hyper_rustls::HttpsConnector<HttpConnector>;
    pub(super) type Transport = FollowRedirect<Client<Connector, Full<Bytes>>>;

    pub(super) fn client(config: &Config) -> Result<Transport, Error> {
        let tls_config = rustls::ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::aws_lc_rs::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(Error::Tls)?
        .with_webpki_roots()
        .with_no_client_auth();
        let builder = hyper_rustls::HttpsConnectorBuilder::new().with_tls_config(tls_config);
        let builder = if config.https_only {
            builder.https_only()
        } else {
            builder.https_or_http()
        };
        let connector = builder.enable_http1().build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(ServiceBuilder::new()
            .layer(FollowRedirectLayer::new())
            .service(client))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    #[test]
    fn test_url() {
        assert_eq!(
            super::HttpClientFactory::url("todos/7", Some("http://api.local/v1/"))
                .unwrap()
                .as_str(),
            "http://api.local/v1/todos/7",
        );
        assert_eq!(
            super::HttpClientFactory::url("/health", Some("http://api.local/v1/"))
                .unwrap()
                .as_str(),
            "http://api.local/health",
        );
        assert_eq!(
            super::HttpClientFactory::url("https://other.local/x", Some("http://api.local/"))
                .unwrap()
                .as_str(),
            "https://other.local/x",
        );
        assert!(super::HttpClientFactory::url("todos/7", None).is_err());
    }

    #[cfg(feature = "hyper")]
    #[tokio::test]
    async fn test_fetch_is_cached() {
        let factory = super::HttpClientFactory::default();
        let a = factory.fetch().unwrap();
        let b = factory.fetch().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[cfg(feature = "reqwest")]
    #[test]
    fn test_dispatch_is_cached() {
        let factory = super::HttpClientFactory::default();
        let a = factory.dispatch().unwrap();
        let b = factory.dispatch().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[cfg(all(feature = "hyper", feature = "reqwest"))]
    #[tokio::test]
    async fn test_kinds_are_distinct() {
        let factory = super::HttpClientFactory::default();
        let fetch = factory.fetch().unwrap();
        let dispatch = factory.dispatch().unwrap();
        assert!(!Arc::ptr_eq(&fetch, &dispatch));
    }
}
