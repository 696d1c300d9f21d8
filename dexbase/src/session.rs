use crate::{Cache, Error, Result};

use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

/// A handle to the remote API.
///
/// Every request goes through [`Session::request`], which retries failed
/// attempts with a fixed delay. When a [`Cache`] is attached, [`Session::fetch`]
/// consults it before hitting the network.
#[derive(Debug, Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    base_url: Arc<str>,
    attempts: usize,
    retry_delay: Duration,
    cache: Option<Cache>,
}

impl Session {
    pub const API_URL: &str = "https://pokeapi.co/api/v2";
    pub const ATTEMPTS: usize = 5;
    pub const RETRY_DELAY: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::with_transport(Http::new(Http::TIMEOUT))
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Arc::new(transport),
            base_url: Arc::from(Self::API_URL),
            attempts: Self::ATTEMPTS,
            retry_delay: Self::RETRY_DELAY,
            cache: None,
        }
    }

    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = Arc::from(base_url.as_ref().trim_end_matches('/'));
        self
    }

    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn cache(mut self, cache: Cache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolves a resource path (e.g. `type/fire`) against the base URL.
    /// Absolute URLs, like pagination cursors, are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }

        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Performs a GET request, retrying every failed attempt.
    ///
    /// The last error is returned once all attempts are exhausted.
    pub async fn request(&self, url: &str) -> Result<Bytes> {
        log::info!("Requesting: {url}");

        retry(self.attempts - 1, self.retry_delay, || self.transport.get(url)).await
    }

    /// Fetches and decodes a resource.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);

        if let Some(body) = self.cache.as_ref().and_then(|cache| cache.get(&url)) {
            log::debug!("Cache hit: {url}");

            return Ok(serde_json::from_slice(&body)?);
        }

        let body = self.request(&url).await?;
        let resource = serde_json::from_slice(&body)?;

        if let Some(cache) = &self.cache {
            cache.insert(url, body);
        }

        Ok(resource)
    }

    /// Downloads raw bytes (e.g. a sprite) without touching the cache.
    pub async fn download(&self, url: &str) -> Result<Bytes> {
        self.request(url).await
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// The raw HTTP layer underneath a [`Session`].
///
/// Implementations must map any non-success status to an error; a `404`
/// becomes [`Error::NotFound`].
pub trait Transport: fmt::Debug + Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes>> {
        (**self).get(url)
    }
}

#[derive(Debug, Clone)]
pub struct Http {
    client: reqwest::Client,
}

impl Http {
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::ClientBuilder::new()
                .timeout(timeout)
                .build()
                .expect("Build reqwest client"),
        }
    }
}

impl Transport for Http {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes>> {
        async move {
            let response = self.client.get(url).send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(Error::NotFound(url.to_owned()));
            }

            if !status.is_success() {
                return Err(Error::Status {
                    url: url.to_owned(),
                    status: status.as_u16(),
                });
            }

            Ok(response.bytes().await?)
        }
        .boxed()
    }
}

async fn retry<T, E, F>(mut retries: usize, delay: Duration, f: impl Fn() -> F) -> Result<T, E>
where
    E: fmt::Display,
    F: Future<Output = Result<T, E>>,
{
    loop {
        let result = f().await;

        match result {
            Ok(response) => {
                break Ok(response);
            }
            Err(error) => {
                if retries > 0 {
                    log::warn!(
                        "{error} ({retries} {} left)",
                        if retries == 1 { "retry" } else { "retries" }
                    );
                    retries -= 1;

                    time::sleep(delay).await;
                } else {
                    break Err(error);
                }
            }
        }
    }
}
