use crate::dexbase::session::Http;
use crate::dexbase::{Cache, Session};

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub attempts: usize,
    /// Milliseconds between attempts.
    pub retry_delay: u64,
    /// Seconds before a single attempt times out.
    pub timeout: u64,
    /// Seconds a response stays cached; `None` disables caching.
    pub cache_ttl: Option<u64>,
}

impl Config {
    const API_URL_VAR: &str = "TEAMDECK_API_URL";

    pub async fn load() -> Result<Self, anywho::Error> {
        let path = config_path();

        let config = if fs::try_exists(&path).await? {
            Self::parse(&fs::read_to_string(&path).await?)
        } else {
            Self::default()
        };

        Ok(config.with_api_url(env::var(Self::API_URL_VAR).ok()))
    }

    fn parse(contents: &str) -> Self {
        match ron::from_str(contents) {
            Ok(config) => config,
            Err(error) => {
                log::error!("Invalid configuration ({}): {error}", config_path().display());

                Self::default()
            }
        }
    }

    fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(api_url) = api_url.filter(|api_url| !api_url.trim().is_empty()) {
            log::info!("Using API from {}: {api_url}", Self::API_URL_VAR);

            self.api_url = api_url;
        }

        self
    }

    pub fn session(&self) -> Session {
        let session = Session::with_transport(Http::new(Duration::from_secs(self.timeout)))
            .base_url(&self.api_url)
            .attempts(self.attempts)
            .retry_delay(Duration::from_millis(self.retry_delay));

        match self.cache_ttl {
            Some(ttl) => session.cache(Cache::new(Duration::from_secs(ttl))),
            None => session,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Session::API_URL.to_owned(),
            attempts: Session::ATTEMPTS,
            retry_delay: Session::RETRY_DELAY.as_millis() as u64,
            timeout: Http::TIMEOUT.as_secs(),
            cache_ttl: Some(600),
        }
    }
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join(env!("CARGO_PKG_NAME"))
        .join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_keep_defaults() {
        let config = Config::parse("(attempts: 2, cache_ttl: None)");

        assert_eq!(config.attempts, 2);
        assert_eq!(config.cache_ttl, None);
        assert_eq!(config.api_url, Session::API_URL);
        assert_eq!(config.retry_delay, 1000);
    }

    #[test]
    fn api_url_override_wins_over_the_file() {
        let config = Config::parse("(api_url: \"https://file.test/api/v2\")")
            .with_api_url(Some("https://env.test/api/v2".to_owned()));

        assert_eq!(config.api_url, "https://env.test/api/v2");
    }

    #[test]
    fn missing_or_blank_override_keeps_the_file() {
        let file = Config::parse("(api_url: \"https://file.test/api/v2\")");

        assert_eq!(file.clone().with_api_url(None), file);
        assert_eq!(file.clone().with_api_url(Some("  ".to_owned())), file);
    }

    #[test]
    fn invalid_files_fall_back_to_defaults() {
        assert_eq!(Config::parse("(attempts: \"many\")"), Config::default());
    }
}
