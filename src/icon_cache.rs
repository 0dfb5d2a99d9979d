use std::{collections::HashMap, sync::Arc};

use iced::Task;
use iced_core::image::Handle;

use crate::fetcher::Fetcher;

/// Downloads of one icon before its marker keeps the fallback dot.
const MAX_ATTEMPTS: u32 = 3;

/// Result of fetching a marker icon.
#[derive(Debug, Clone)]
pub enum IconMessage {
    Loaded { url: String, handle: Handle },
    LoadFailed { url: String },
}

/// Marker icon images keyed by their URL.
pub(crate) struct IconCache {
    /// `None` marks an icon which is requested or currently being fetched.
    images: HashMap<String, Option<Handle>>,
    /// Failed downloads per URL.
    failures: HashMap<String, u32>,
    pending: Vec<String>,
    fetcher: Arc<Fetcher>,
}

impl IconCache {
    pub(crate) fn new(fetcher: Arc<Fetcher>) -> Self {
        Self {
            images: HashMap::new(),
            failures: HashMap::new(),
            pending: Vec::new(),
            fetcher,
        }
    }

    pub(crate) fn get(&self, url: &str) -> Option<&Handle> {
        self.images.get(url).and_then(|inner| inner.as_ref())
    }

    /// Queued or being fetched.
    pub(crate) fn is_loading(&self, url: &str) -> bool {
        matches!(self.images.get(url), Some(None))
    }

    /// Queue an icon for download, unless it is known already.
    pub(crate) fn request(&mut self, url: &str) {
        if !self.images.contains_key(url) {
            self.images.insert(url.to_owned(), None);
            self.pending.push(url.to_owned());
        }
    }

    pub(crate) fn fetch_pending(&mut self) -> Task<IconMessage> {
        Task::batch(self.pending.drain(..).map(|url| {
            let fetcher = self.fetcher.clone();
            Task::future(async move {
                match fetcher.fetch(url.clone()).await {
                    Ok(handle) => IconMessage::Loaded { url, handle },
                    Err(error) => {
                        log::warn!("failed to load marker icon {url}: {error}");
                        IconMessage::LoadFailed { url }
                    }
                }
            })
        }))
    }

    pub(crate) fn update(&mut self, message: IconMessage) {
        match message {
            IconMessage::Loaded { url, handle } => {
                self.failures.remove(&url);
                self.images.insert(url, Some(handle));
            }
            // Icons stay on the map, unlike tiles, so they are queued again.
            // The fetcher's permit timeout spaces out the attempts.
            IconMessage::LoadFailed { url } => {
                let failures = self.failures.entry(url.clone()).or_default();
                *failures += 1;

                if *failures < MAX_ATTEMPTS {
                    self.pending.push(url);
                } else {
                    log::warn!("giving up on marker icon {url} after {MAX_ATTEMPTS} attempts");
                    self.failures.remove(&url);
                    self.images.remove(&url);
                }
            }
        }
    }
}
