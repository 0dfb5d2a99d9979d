use iced::{Point, Rectangle, Vector};

use crate::{Mercator, Viewpoint};

/// A snapshot of the map viewport, converting between three spaces:
///
/// - screen space, pixels from the top left corner of the map widget
/// - pixel space, pixels from the center of the world at the current zoom
/// - [`Mercator`] positions on the map
///
/// The map widget publishes a new projector whenever it is moved or resized.
#[derive(Debug, Clone, PartialEq)]
pub struct Projector {
    pub viewpoint: Viewpoint,
    pub cursor: Option<Point>,
    pub bounds: Rectangle,
}

impl Projector {
    /// Distances between points in pixel space are on-screen distances, at
    /// any position of the viewport.
    pub fn mercator_into_pixel_space(&self, position: Mercator) -> Point<f64> {
        position.into_pixel_space(self.viewpoint.zoom.f64())
    }

    pub fn pixel_space_into_mercator(&self, point: Point<f64>) -> Mercator {
        Mercator::from_pixel_space(point, self.viewpoint.zoom.f64())
    }

    /// Positions outside the viewport land outside of `bounds`.
    pub fn mercator_into_screen_space(&self, position: Mercator) -> Point<f32> {
        self.pixel_space_into_screen_space(self.mercator_into_pixel_space(position))
    }

    pub fn screen_space_into_mercator(&self, point: Point<f32>) -> Mercator {
        self.pixel_space_into_mercator(self.screen_space_into_pixel_space(point))
    }

    /// Pixel space needs `f64`, at high zoom the world is far wider than `f32`
    /// resolves to single pixels.
    pub fn screen_space_into_pixel_space(&self, point: Point<f32>) -> Point<f64> {
        let offset = point - self.bounds.center();
        self.viewpoint.snapped_pixel_space() + Vector::new(offset.x as f64, offset.y as f64)
    }

    pub fn pixel_space_into_screen_space(&self, point: Point<f64>) -> Point<f32> {
        let offset = point - self.viewpoint.snapped_pixel_space();
        self.bounds.center() + Vector::new(offset.x as f32, offset.y as f32)
    }
}
