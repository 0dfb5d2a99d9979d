use iced::{Point, Rectangle, Vector};

use crate::{Mercator, Zoom};

/// What the map looks at: the position in the center of the viewport, and the zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Mercator,
    pub zoom: Zoom,
}

impl Viewpoint {
    pub fn move_to_mercator(&mut self, mercator: Mercator) {
        self.position = mercator;
    }

    pub fn into_pixel_space(&self) -> Point<f64> {
        self.position.into_pixel_space(self.zoom.f64())
    }

    /// Like [`Viewpoint::into_pixel_space`], snapped to whole pixels so tiles
    /// and overlays line up.
    pub(crate) fn snapped_pixel_space(&self) -> Point<f64> {
        let center = self.into_pixel_space();
        Point::new(center.x.round(), center.y.round())
    }

    /// The map position shown at a point of the viewport.
    pub fn position_in_viewport(&self, position: Point, bounds: Rectangle) -> Mercator {
        let offset = position - bounds.center();
        let offset = Vector::new(offset.x as f64, offset.y as f64);
        Mercator::from_pixel_space(self.into_pixel_space() + offset, self.zoom.f64())
    }

    /// Zoom by `amount` levels, keeping the map position under `position` in place.
    pub fn zoom_on_point(&mut self, amount: f64, position: Point, bounds: Rectangle) {
        let offset = position - bounds.center();
        let offset = Vector::new(offset.x as f64, offset.y as f64);

        // Zoom around the point by centering on it, then move back by the same pixels
        self.position = self.position_in_viewport(position, bounds);
        self.zoom.zoom_by(amount);
        self.position =
            Mercator::from_pixel_space(self.into_pixel_space() - offset, self.zoom.f64());
    }
}
