//! Request-library transport backed by [`reqwest::Client`].
//!
//! Bodies are parsed the way request libraries usually do it: JSON is
//! attempted whatever the `content-type` says, and the raw text is kept when
//! that fails. Any status outside 2xx is rejected with the parsed reply
//! attached.

use crate::adapter::dispatch::{Rejection, Reply, RequestConfig};
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::Value;
use std::task::{Context, Poll};

#[derive(Clone, Debug, Default)]
pub struct Service {
    client: reqwest::Client,
}

impl Service {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl tower::Service<RequestConfig> for Service {
    type Response = Reply;
    type Error = Rejection;
    type Future = BoxFuture<'static, Result<Reply, Rejection>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, config: RequestConfig) -> Self::Future {
        let client = self.client.clone();
        async move {
            let RequestConfig {
                url,
                method,
                data,
                headers,
            } = config;
            let mut builder = client
                .request(http::Method::from(method), url.as_str())
                .headers(headers);
            if let Some(data) = data {
                builder = builder.body(data);
            }
            let response = builder.send().await.map_err(Rejection::network)?;

            let status = response.status();
            let headers = response.headers().clone();
            let url = response.url().to_string();
            let body = response.bytes().await.map_err(Rejection::network)?;
            let reply = Reply {
                data: parse(&body),
                status,
                headers,
                url: Some(url),
            };
            if status.is_success() {
                Ok(reply)
            } else {
                Err(Rejection::status(reply))
            }
        }
        .boxed()
    }
}

fn parse(body: &Bytes) -> Option<Value> {
    if body.is_empty() {
        return None;
    }

    match serde_json::from_slice(body) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(body).into_owned())),
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    #[test]
    fn test_parse_json() {
        assert_eq!(
            super::parse(&Bytes::from_static(b"[1,2]")),
            Some(json!([1, 2])),
        );
        assert_eq!(
            super::parse(&Bytes::from_static(br#"{"title":"bad"}"#)),
            Some(json!({"title": "bad"})),
        );
        assert_eq!(super::parse(&Bytes::from_static(b"42")), Some(json!(42)));
    }

    #[test]
    fn test_parse_text_fallback() {
        assert_eq!(
            super::parse(&Bytes::from_static(b"bad input")),
            Some(json!("bad input")),
        );
        assert_eq!(super::parse(&Bytes::from_static(b"{")), Some(json!("{")));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(super::parse(&Bytes::new()), None);
        assert_eq!(super::parse(&Bytes::from_static(b"null")), None);
    }
}
