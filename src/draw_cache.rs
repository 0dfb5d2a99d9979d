use std::collections::BTreeMap;

use iced::Rectangle;
use iced_core::image::Handle;

use crate::tile::TileId;

/// Tiles collected for a single frame, keyed by zoom level so that
/// coarser fallback tiles are drawn underneath the finer ones.
#[derive(Default)]
pub(crate) struct DrawCache {
    levels: BTreeMap<u8, Vec<(TileId, Handle, Rectangle)>>,
}

impl DrawCache {
    /// Check whether the cache contains some tile
    pub fn contains(&self, tile_id: &TileId) -> bool {
        self.levels
            .get(&tile_id.zoom())
            .is_some_and(|tiles| tiles.iter().any(|(id, ..)| id == tile_id))
    }

    /// Insert a tile using its id, image handle and its screen-space rectangle
    pub fn insert(&mut self, tile_id: TileId, handle: Handle, rectangle: Rectangle) {
        self.levels
            .entry(tile_id.zoom())
            .or_default()
            .push((tile_id, handle, rectangle));
    }

    /// Iterate through all tiles in ascending zoom order
    pub fn iter(&self) -> impl Iterator<Item = (&Handle, Rectangle)> {
        self.levels
            .values()
            .flatten()
            .map(|(_, handle, rectangle)| (handle, *rectangle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarse_tiles_come_first() {
        let handle = Handle::from_bytes(vec![0u8; 4]);
        let fine = Rectangle::new(iced::Point::ORIGIN, iced::Size::new(256.0, 256.0));
        let coarse = Rectangle::new(iced::Point::ORIGIN, iced::Size::new(512.0, 512.0));

        let mut cache = DrawCache::default();
        cache.insert(TileId::new(2, 2, 3), handle.clone(), fine);
        cache.insert(TileId::new(1, 1, 2), handle, coarse);

        assert!(cache.contains(&TileId::new(1, 1, 2)));
        assert!(!cache.contains(&TileId::new(0, 0, 2)));
        assert_eq!(
            cache.iter().map(|(_, rectangle)| rectangle).collect::<Vec<_>>(),
            [coarse, fine]
        );
    }
}
