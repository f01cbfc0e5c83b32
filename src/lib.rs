//! A single `Request -> Response` contract over interchangeable HTTP
//! transports, with every failure reported as one typed [`Error`].

pub mod adapter;
pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod method;
pub mod request;
pub mod response;
pub mod transport;

pub use client::{HttpClient, HttpClientExt};
pub use config::Config;
pub use error::Error;
pub use factory::HttpClientFactory;
pub use method::Method;
pub use request::Request;
pub use response::Response;
