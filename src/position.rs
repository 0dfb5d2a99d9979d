//! Spherical (Web) Mercator positions, the internal coordinates of the map.
//! <https://en.wikipedia.org/wiki/Web_Mercator_projection>

use std::f64::consts::PI;

use iced::Point;

use crate::tile::TileId;

/// Size in pixels of the whole world at zoom level 0.
pub const TILE_SIZE: u32 = 256;

/// Half of the equatorial circumference, in meters. Projected meters range
/// from `-HALF_CIRCUMFERENCE` to `HALF_CIRCUMFERENCE` on both axes.
pub const HALF_CIRCUMFERENCE: f64 = PI * 6_378_137.0;

/// Tiles along each axis of the grid at `zoom`.
pub(crate) fn total_tiles(zoom: u8) -> u32 {
    2u32.pow(zoom as u32)
}

fn half_world_pixels(zoom: f64) -> f64 {
    2f64.powf(zoom - 1.0) * TILE_SIZE as f64
}

/// A position on the square Mercator map, `-1.0..=1.0` on both axes.
/// x grows eastwards and y grows southwards, the same way as screen space.
/// Latitudes beyond about 85.05° are cut off at the square's edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    x: f64,
    y: f64,
}

impl Mercator {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(-1., 1.),
            y: y.clamp(-1., 1.),
        }
    }

    /// From projected meters (EPSG:3857), where northing grows northwards.
    pub fn from_meters(easting: f64, northing: f64) -> Self {
        Self::new(easting / HALF_CIRCUMFERENCE, -northing / HALF_CIRCUMFERENCE)
    }

    /// Into projected meters (EPSG:3857) as `(easting, northing)`.
    pub fn meters(&self) -> (f64, f64) {
        (self.x * HALF_CIRCUMFERENCE, -self.y * HALF_CIRCUMFERENCE)
    }

    pub fn as_geographic(&self) -> Geographic {
        Geographic::new(
            (self.x * PI).to_degrees(),
            -(self.y * PI).sinh().atan().to_degrees(),
        )
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Pixel space has its origin in the center of the world, which is
    /// `TILE_SIZE * 2^zoom` pixels wide.
    pub fn from_pixel_space(point: Point<f64>, zoom: f64) -> Self {
        let half_width = half_world_pixels(zoom);
        Self::new(point.x / half_width, point.y / half_width)
    }

    pub fn into_pixel_space(&self, zoom: f64) -> Point<f64> {
        let half_width = half_world_pixels(zoom);
        Point::new(self.x * half_width, self.y * half_width)
    }

    /// The tile containing this position at a zoom level.
    pub fn tile_id(&self, zoom: u8) -> TileId {
        let tiles = total_tiles(zoom) as f64;
        let column = ((self.x + 1.0) / 2.0 * tiles).floor() as u32;
        let row = ((self.y + 1.0) / 2.0 * tiles).floor() as u32;

        TileId::new(column, row, zoom)
    }
}

/// Longitude and latitude in degrees, clamped to `-180.0..=180.0` and `-90.0..=90.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geographic {
    lon: f64,
    lat: f64,
}

impl Geographic {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: lon.clamp(-180., 180.),
            lat: lat.clamp(-90., 90.),
        }
    }

    pub fn as_mercator(&self) -> Mercator {
        Mercator::new(
            self.lon.to_radians() / PI,
            -self.lat.to_radians().tan().asinh() / PI,
        )
    }

    pub fn longitude(&self) -> f64 {
        self.lon
    }

    pub fn latitude(&self) -> f64 {
        self.lat
    }
}
