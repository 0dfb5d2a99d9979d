use std::time::Duration;

use iced_core::image::Handle;
use tokio::sync::Semaphore;

/// Upper bound on simultaneous requests against image servers.
const MAX_CONCURRENT_REQUESTS: usize = 6;

#[derive(thiserror::Error, Debug)]
pub(crate) enum FetchError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("The semaphore timed out")]
    SemaphoreTimeout,
    #[error("The semaphore was closed")]
    SemaphoreClosed,
}

/// Downloads images (tiles and marker icons) over a shared HTTP client.
#[derive(Debug)]
pub(crate) struct Fetcher {
    semaphore: Semaphore,
    client: reqwest::Client,
}

impl Fetcher {
    pub(crate) fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            semaphore: Semaphore::new(MAX_CONCURRENT_REQUESTS),
            client: reqwest::ClientBuilder::new()
                .user_agent(concat!("mapfront/", env!("CARGO_PKG_VERSION")))
                .build()?,
        })
    }

    pub(crate) async fn fetch(&self, url: String) -> Result<Handle, FetchError> {
        // Assume that if we have been waiting for more than a second,
        // the camera may have moved and the image is no longer needed.
        let _permit = tokio::time::timeout(Duration::from_secs(1), self.semaphore.acquire())
            .await
            .map_err(|_| FetchError::SemaphoreTimeout)?
            .map_err(|_| FetchError::SemaphoreClosed)?;

        let response = self.client.get(url).send().await?.error_for_status()?;

        let bytes = response.bytes().await?;
        Ok(Handle::from_bytes(bytes))
    }
}
