use iced::{Point, Rectangle, Size, Vector};

use crate::position::total_tiles;

/// A tile of the slippy map grid, numbered from the north west corner.
/// See <https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames>
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct TileId {
    x: u32,
    y: u32,
    zoom: u8,
}

impl TileId {
    /// The single tile covering the whole world.
    pub const ZERO: Self = TileId {
        x: 0,
        y: 0,
        zoom: 0,
    };

    /// Numbers past the edge of the grid are moved onto the last tile.
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        let last = total_tiles(zoom) - 1;
        TileId {
            x: x.min(last),
            y: y.min(last),
            zoom,
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// The north west corner in pixel space, for tiles drawn `tile_size` pixels wide.
    pub fn project(&self, tile_size: f64) -> Point<f64> {
        let half = total_tiles(self.zoom) as f64 / 2.0;
        Point::new(
            (self.x as f64 - half) * tile_size,
            (self.y as f64 - half) * tile_size,
        )
    }

    /// Where the tile lands on screen, when the viewport center shows
    /// `center` in pixel space.
    pub fn on_viewport(
        &self,
        viewport: Rectangle,
        tile_size: f64,
        center: Point<f64>,
    ) -> Rectangle {
        let offset = self.project(tile_size) - center;
        let top_left = viewport.center() + Vector::new(offset.x as f32, offset.y as f32);
        let side = tile_size as f32;

        Rectangle::new(top_left, Size::new(side, side))
    }

    /// The tile one zoom level lower which covers this one.
    pub fn downsample(&self) -> Option<TileId> {
        Some(TileId {
            x: self.x / 2,
            y: self.y / 2,
            zoom: self.zoom.checked_sub(1)?,
        })
    }

    pub fn east(&self) -> Option<TileId> {
        (self.x < total_tiles(self.zoom) - 1).then(|| TileId {
            x: self.x + 1,
            ..*self
        })
    }

    pub fn west(&self) -> Option<TileId> {
        Some(TileId {
            x: self.x.checked_sub(1)?,
            ..*self
        })
    }

    pub fn north(&self) -> Option<TileId> {
        Some(TileId {
            y: self.y.checked_sub(1)?,
            ..*self
        })
    }

    pub fn south(&self) -> Option<TileId> {
        (self.y < total_tiles(self.zoom) - 1).then(|| TileId {
            y: self.y + 1,
            ..*self
        })
    }

    pub fn neighbors(&self) -> [Option<TileId>; 4] {
        [self.north(), self.east(), self.south(), self.west()]
    }
}
