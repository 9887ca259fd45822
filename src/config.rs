use std::convert::TryFrom;
use std::time::Duration;

use serde::Deserialize;

use crate::API_HOST;

/// Construction input for [`Client`](crate::Client).
///
/// Can be built in code or deserialized from any serde format:
///
/// ```
/// # use instagram_sdk::Config;
/// let config = Config::new("<CLIENT_ID>", "<CLIENT_SECRET>", "https://example.com/callback")
///     .state("xyz")
///     .timeout(std::time::Duration::from_secs(10));
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
    #[serde(default)]
    pub api_host: Option<String>,
}

impl Config {
    pub fn new<TId, TSecret, TCallback>(
        client_id: TId,
        client_secret: TSecret,
        callback_url: TCallback,
    ) -> Self
    where
        TId: Into<String>,
        TSecret: Into<String>,
        TCallback: Into<String>,
    {
        Config {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: callback_url.into(),
            state: None,
            timeout_ms: None,
            connect_timeout_ms: None,
            api_host: None,
        }
    }

    /// set the `state` sent with the authorization request
    pub fn state<T: Into<String>>(self, state: T) -> Self {
        Config {
            state: Some(state.into()),
            ..self
        }
    }

    /// set the total request timeout
    pub fn timeout(self, timeout: Duration) -> Self {
        Config {
            timeout_ms: Some(millis(timeout)),
            ..self
        }
    }

    /// set the connect timeout
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        Config {
            connect_timeout_ms: Some(millis(timeout)),
            ..self
        }
    }

    /// Override the API host, e.g. to point at a proxy.
    ///
    /// # Note
    /// A missing trailing `/` is added, so `http://localhost:8080` and
    /// `http://localhost:8080/` are equivalent.
    pub fn api_host<T: Into<String>>(self, api_host: T) -> Self {
        Config {
            api_host: Some(api_host.into()),
            ..self
        }
    }

    pub(crate) fn resolved_api_host(&self) -> String {
        let mut host = self.api_host.as_deref().unwrap_or(API_HOST).to_string();
        if !host.ends_with('/') {
            host.push('/');
        }
        host
    }

    pub(crate) fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub(crate) fn connect_timeout_duration(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = Config::new("id", "secret", "https://cb")
            .state("S1")
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5));
        assert_eq!(config.state.as_deref(), Some("S1"));
        assert_eq!(config.timeout_ms, Some(30_000));
        assert_eq!(config.connect_timeout_ms, Some(5_000));
        assert_eq!(config.resolved_api_host(), API_HOST);
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"client_id":"id","client_secret":"secret","callback_url":"https://cb","api_host":"http://localhost/"}"#,
        )
        .unwrap();
        assert_eq!(config.state, None);
        assert_eq!(config.timeout_ms, None);
        assert_eq!(config.resolved_api_host(), "http://localhost/");
    }

    #[test]
    fn sub_second_timeouts_are_kept() {
        let config = Config::new("id", "secret", "https://cb")
            .timeout(Duration::from_millis(500))
            .connect_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout_ms, Some(500));
        assert_eq!(config.timeout_duration(), Some(Duration::from_millis(500)));
        assert_eq!(
            config.connect_timeout_duration(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn api_host_gets_trailing_slash() {
        let config = Config::new("id", "secret", "https://cb").api_host("http://localhost:8080");
        assert_eq!(config.resolved_api_host(), "http://localhost:8080/");
        let config = config.api_host("http://localhost:8080/");
        assert_eq!(config.resolved_api_host(), "http://localhost:8080/");
    }

    #[test]
    fn deserialize_requires_credentials() {
        let parsed = serde_json::from_str::<Config>(r#"{"client_id":"id"}"#);
        assert!(parsed.is_err());
    }
}
