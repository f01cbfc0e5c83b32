use http::StatusCode;
use serde_json::Value;

const UNAUTHORIZED: &str = "The request was not authorized.";
const FORBIDDEN: &str = "The request was forbidden.";
const SERVER_ERROR: &str = "An unexpected server error occurred.";

/// Every non-success outcome of an adapter.
///
/// Adapters never let a transport failure escape in any other shape. A value of
/// this type that travels through a transport (boxed as its error) comes back
/// out of the adapter unchanged.
#[derive(Clone, Debug, PartialEq, thiserror::Error, serde::Serialize, serde::Deserialize)]
#[serde(into = "Payload", try_from = "Payload")]
pub enum Error {
    #[error("Bad Request: \"{}\"", .body.as_ref().unwrap_or(&Value::Null))]
    BadRequest { body: Option<Value> },
    #[error("{message}")]
    Unauthorized { message: String },
    #[error("{message}")]
    Forbidden { message: String },
    #[error("The requested resource was not found at {url}")]
    NotFound { url: String },
    #[error("{message}")]
    ServerError { message: String },
}

impl Error {
    pub fn bad_request(body: Option<Value>) -> Self {
        Self::BadRequest { body }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            message: UNAUTHORIZED.to_owned(),
        }
    }

    pub fn forbidden() -> Self {
        Self::Forbidden {
            message: FORBIDDEN.to_owned(),
        }
    }

    pub fn not_found<U>(url: U) -> Self
    where
        U: Into<String>,
    {
        Self::NotFound { url: url.into() }
    }

    pub fn server_error() -> Self {
        Self::ServerError {
            message: SERVER_ERROR.to_owned(),
        }
    }

    /// Maps a failed HTTP status to its variant.
    ///
    /// `body` is only kept for 400 and `url` only for 404. Any status without a
    /// dedicated variant, 500 included, is a `ServerError`.
    pub fn from_status<U>(status: StatusCode, body: Option<Value>, url: U) -> Self
    where
        U: Into<String>,
    {
        match status {
            StatusCode::BAD_REQUEST => Self::bad_request(body),
            StatusCode::UNAUTHORIZED => Self::unauthorized(),
            StatusCode::FORBIDDEN => Self::forbidden(),
            StatusCode::NOT_FOUND => Self::not_found(url),
            _ => Self::server_error(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "HttpBadRequest",
            Self::Unauthorized { .. } => "HttpUnauthorized",
            Self::Forbidden { .. } => "HttpForbidden",
            Self::NotFound { .. } => "HttpNotFound",
            Self::ServerError { .. } => "HttpServerError",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plain structured form of an [`Error`], safe to log or send over the wire.
#[serde_with::serde_as]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub name: String,
    pub message: String,
    #[serde_as(as = "serde_with::TryFromInto<u16>")]
    pub status_code: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl From<Error> for Payload {
    fn from(value: Error) -> Self {
        let name = value.name().to_owned();
        let message = value.to_string();
        let status_code = value.status_code();
        let (url, body) = match value {
            Error::BadRequest { body } => (None, body),
            Error::NotFound { url } => (Some(url), None),
            _ => (None, None),
        };
        Self {
            name,
            message,
            status_code,
            url,
            body,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("unknown error kind `{0}`")]
    UnknownKind(String),
    #[error("`{0}` payload is missing `url`")]
    MissingUrl(String),
}

impl TryFrom<Payload> for Error {
    type Error = PayloadError;

    fn try_from(value: Payload) -> Result<Self, Self::Error> {
        let Payload {
            name,
            message,
            url,
            body,
            ..
        } = value;
        match name.as_str() {
            "HttpBadRequest" => Ok(Self::BadRequest { body }),
            "HttpUnauthorized" => Ok(Self::Unauthorized { message }),
            "HttpForbidden" => Ok(Self::Forbidden { message }),
            "HttpNotFound" => match url {
                Some(url) => Ok(Self::NotFound { url }),
                None => Err(PayloadError::MissingUrl(name)),
            },
            "HttpServerError" => Ok(Self::ServerError { message }),
            _ => Err(PayloadError::UnknownKind(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use serde_json::json;

    #[test]
    fn test_from_status() {
        let url = "http://x/missing";
        assert_eq!(
            super::Error::from_status(StatusCode::BAD_REQUEST, Some(json!("bad input")), url),
            super::Error::bad_request(Some(json!("bad input"))),
        );
        assert_eq!(
            super::Error::from_status(StatusCode::UNAUTHORIZED, Some(json!("x")), url),
            super::Error::unauthorized(),
        );
        assert_eq!(
            super::Error::from_status(StatusCode::FORBIDDEN, None, url),
            super::Error::forbidden(),
        );
        assert_eq!(
            super::Error::from_status(StatusCode::NOT_FOUND, Some(json!("x")), url),
            super::Error::not_found(url),
        );
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::CONFLICT,
            StatusCode::IM_A_TEAPOT,
        ] {
            assert_eq!(
                super::Error::from_status(status, Some(json!("x")), url),
                super::Error::server_error(),
            );
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(
            super::Error::bad_request(Some(json!("bad input"))).to_string(),
            r#"Bad Request: ""bad input"""#,
        );
        assert_eq!(
            super::Error::bad_request(None).to_string(),
            r#"Bad Request: "null""#,
        );
        assert_eq!(
            super::Error::not_found("http://x/missing").to_string(),
            "The requested resource was not found at http://x/missing",
        );
        assert_eq!(
            super::Error::server_error().to_string(),
            "An unexpected server error occurred.",
        );
        assert_eq!(
            super::Error::unauthorized().status_code(),
            StatusCode::UNAUTHORIZED,
        );
        assert_eq!(super::Error::forbidden().name(), "HttpForbidden");
    }

    #[test]
    fn test_serialize() {
        assert_eq!(
            serde_json::to_value(super::Error::not_found("http://x/missing")).unwrap(),
            json!({
                "name": "HttpNotFound",
                "message": "The requested resource was not found at http://x/missing",
                "statusCode": 404,
                "url": "http://x/missing",
            }),
        );
        assert_eq!(
            serde_json::to_value(super::Error::bad_request(Some(json!({"field": "name"}))))
                .unwrap(),
            json!({
                "name": "HttpBadRequest",
                "message": r#"Bad Request: "{"field":"name"}""#,
                "statusCode": 400,
                "body": {"field": "name"},
            }),
        );
        assert_eq!(
            serde_json::to_value(super::Error::server_error()).unwrap(),
            json!({
                "name": "HttpServerError",
                "message": "An unexpected server error occurred.",
                "statusCode": 500,
            }),
        );
    }

    #[test]
    fn test_deserialize() {
        let e = serde_json::from_value::<super::Error>(json!({
            "name": "HttpForbidden",
            "message": "no access to this tenant",
            "statusCode": 403,
        }))
        .unwrap();
        assert_eq!(
            e,
            super::Error::Forbidden {
                message: "no access to this tenant".to_owned(),
            },
        );

        let e = serde_json::from_value::<super::Error>(json!({
            "name": "HttpTeapot",
            "message": "short and stout",
            "statusCode": 418,
        }))
        .unwrap_err();
        assert!(e.to_string().contains("HttpTeapot"));
    }

    #[test]
    fn test_deserialize_not_found() {
        let e = serde_json::from_value::<super::Error>(json!({
            "name": "HttpNotFound",
            "message": "The requested resource could not be found.",
            "statusCode": 404,
            "url": "http://api.local/todos/7",
        }))
        .unwrap();
        assert_eq!(e, super::Error::not_found("http://api.local/todos/7"));

        let e = serde_json::from_value::<super::Error>(json!({
            "name": "HttpNotFound",
            "message": "The requested resource could not be found.",
            "statusCode": 404,
        }))
        .unwrap_err();
        assert!(e.to_string().contains("missing `url`"));
    }
}
