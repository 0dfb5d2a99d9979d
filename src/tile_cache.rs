use std::{collections::HashMap, sync::Arc};

use iced::Task;
use iced_core::image::Handle;

use crate::{
    fetcher::Fetcher,
    sources::Source,
    tile::TileId,
};

/// The message that the [`TileCache`] uses to update. It is produced when the
/// [`crate::MapWidget`] finds tiles that still have to be fetched, or when the
/// fetching future resolves and responds with its result.
#[derive(Debug, Clone)]
pub enum CacheMessage {
    Load { id: TileId },
    Loaded { id: TileId, handle: Handle },
    LoadFailed { id: TileId },
}

/// The cache which holds the raster tiles of a single source.
pub struct TileCache {
    /// `None` marks a tile which is currently being fetched.
    cache: HashMap<TileId, Option<Handle>>,
    source: Box<dyn Source>,
    fetcher: Arc<Fetcher>,
}

impl TileCache {
    pub(crate) fn new(source: Box<dyn Source>, fetcher: Arc<Fetcher>) -> Self {
        Self {
            cache: HashMap::new(),
            source,
            fetcher,
        }
    }

    pub fn attribution(&self) -> &'static str {
        self.source.attribution()
    }

    pub fn max_zoom(&self) -> u8 {
        self.source.max_zoom()
    }

    pub fn should_fetch(&self, tile_id: &TileId) -> bool {
        !self.cache.contains_key(tile_id)
    }

    pub fn get(&self, tile_id: &TileId) -> Option<&Handle> {
        self.cache.get(tile_id).and_then(|inner| inner.as_ref())
    }

    pub fn update(&mut self, message: CacheMessage) -> Task<CacheMessage> {
        match message {
            CacheMessage::Loaded { id, handle } => {
                self.cache.insert(id, Some(handle));
            }
            CacheMessage::LoadFailed { id } => {
                // Forget the pending entry so the tile is requested again later
                if self.cache.get(&id).is_some_and(|handle| handle.is_none()) {
                    self.cache.remove(&id);
                }
            }
            CacheMessage::Load { id } => {
                if self.cache.contains_key(&id) {
                    return Task::none();
                }
                self.cache.insert(id, None);

                let url = self.source.tile_url(id);
                let fetcher = self.fetcher.clone();
                return Task::future(async move {
                    match fetcher.fetch(url).await {
                        Ok(handle) => CacheMessage::Loaded { id, handle },
                        Err(error) => {
                            log::warn!("failed to load tile {id:?}: {error}");
                            CacheMessage::LoadFailed { id }
                        }
                    }
                });
            }
        }

        Task::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::OpenStreetMap;

    fn cache() -> TileCache {
        TileCache::new(Box::new(OpenStreetMap), Arc::new(Fetcher::new().unwrap()))
    }

    #[test]
    fn pending_tiles_are_not_fetched_twice() {
        let mut cache = cache();
        let id = TileId::new(1, 1, 2);

        assert!(cache.should_fetch(&id));
        let _ = cache.update(CacheMessage::Load { id });
        assert!(!cache.should_fetch(&id));
        assert!(cache.get(&id).is_none());
    }

    #[test]
    fn failed_tiles_are_retried() {
        let mut cache = cache();
        let id = TileId::new(0, 1, 1);

        let _ = cache.update(CacheMessage::Load { id });
        let _ = cache.update(CacheMessage::LoadFailed { id });
        assert!(cache.should_fetch(&id));
    }

    #[test]
    fn loaded_tiles_are_kept() {
        let mut cache = cache();
        let id = TileId::ZERO;
        let handle = Handle::from_bytes(vec![0u8; 4]);

        let _ = cache.update(CacheMessage::Loaded { id, handle });
        assert!(cache.get(&id).is_some());
        assert!(!cache.should_fetch(&id));
    }
}
