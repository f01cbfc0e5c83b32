use figment::providers::{Env, Serialized};
use figment::Figment;

pub const ENV_PREFIX: &str = "HTTP_ADAPTER_";

/// Settings for the transports built by [`crate::HttpClientFactory`].
///
/// Every field can be overridden from the environment, e.g.
/// `HTTP_ADAPTER_HTTPS_ONLY=true`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Refuse plain `http://` URLs.
    pub https_only: bool,
    /// `user-agent` sent by the request-library transport.
    pub user_agent: Option<String>,
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_env() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }
}
