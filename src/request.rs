use crate::Method;
use headers::{ContentType, HeaderMapExt};
use http::header::ACCEPT;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A single exchange as described by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub url: String,
    pub method: Method,
    pub body: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl Request {
    pub fn new<U>(method: Method, url: U) -> Self
    where
        U: Into<String>,
    {
        Self {
            url: url.into(),
            method,
            body: None,
            headers: HashMap::new(),
        }
    }

    pub fn get<U>(url: U) -> Self
    where
        U: Into<String>,
    {
        Self::new(Method::Get, url)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn json<T>(self, body: &T) -> Result<Self, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        Ok(self.body(serde_json::to_value(body)?))
    }

    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Headers to transmit: `accept` and `content-type` default to
    /// `application/json`, and any caller header with the same name replaces
    /// the default.
    pub fn header_map(&self) -> Result<HeaderMap, http::Error> {
        let mut headers = HeaderMap::with_capacity(self.headers.len() + 2);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.typed_insert(ContentType::json());
        for (name, value) in &self.headers {
            headers.insert(
                HeaderName::try_from(name.as_str())?,
                HeaderValue::try_from(value.as_str())?,
            );
        }
        Ok(headers)
    }

    /// JSON text of the body, never present for GET.
    pub fn transmitted_body(&self) -> Option<String> {
        if self.method == Method::Get {
            None
        } else {
            self.body.as_ref().map(Value::to_string)
        }
    }
}
