use std::f64::consts::PI;

use iced::Color;

use crate::Mercator;

/// Identifies a [`Feature`] within its [`VectorLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Mercator),
    LineString(Vec<Mercator>),
    /// A closed ring, the last vertex connects back to the first.
    Polygon(Vec<Mercator>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
}

/// How the features of a [`VectorLayer`] are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub fill_color: Color,
    pub point_radius: f32,
}

impl Default for Style {
    fn default() -> Self {
        let orange = Color::from_rgb8(0xee, 0x99, 0x00);
        Self {
            stroke_color: orange,
            stroke_width: 4.0,
            fill_color: orange.scale_alpha(0.4),
            point_radius: 6.0,
        }
    }
}

/// Drawn features in insertion order.
#[derive(Debug, Default)]
pub struct VectorLayer {
    features: Vec<Feature>,
    next_id: u64,
    style: Style,
}

impl VectorLayer {
    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn add(&mut self, geometry: Geometry) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        self.features.push(Feature { id, geometry });
        id
    }

    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.id == id)
    }

    /// Remove the given features, returning how many of them existed.
    pub fn remove(&mut self, ids: &[FeatureId]) -> usize {
        let before = self.features.len();
        self.features.retain(|feature| !ids.contains(&feature.id));
        before - self.features.len()
    }

    pub fn clear(&mut self) -> usize {
        let count = self.features.len();
        self.features.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Vertices of a regular polygon around `center`, with `radius` in projected meters.
/// The first vertex is placed at the angle `π(1/sides - 1/2)`, which leaves
/// the bottom edge horizontal.
pub fn regular_polygon(center: Mercator, radius: f64, sides: u32) -> Vec<Mercator> {
    let (easting, northing) = center.meters();
    let start = PI * (1.0 / sides as f64 - 0.5);
    let step = 2.0 * PI / sides as f64;

    (0..sides)
        .map(|side| {
            let angle = start + side as f64 * step;
            Mercator::from_meters(
                easting + radius * angle.cos(),
                northing + radius * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn removes_only_the_subset() {
        let mut layer = VectorLayer::default();
        let a = layer.add(Geometry::Point(Mercator::new(0.0, 0.0)));
        let b = layer.add(Geometry::Point(Mercator::new(0.1, 0.0)));
        let c = layer.add(Geometry::Point(Mercator::new(0.2, 0.0)));

        assert_eq!(layer.remove(&[a, c]), 2);
        assert_eq!(layer.iter().map(|feature| feature.id).collect::<Vec<_>>(), [b]);
        assert_eq!(layer.remove(&[a]), 0);
    }

    #[test]
    fn square_vertices() {
        let center = Mercator::from_meters(1000.0, 2000.0);
        let vertices = regular_polygon(center, 100.0, 4);
        assert_eq!(vertices.len(), 4);

        // First vertex at -45°, bottom edge horizontal
        let offset = 100.0 * std::f64::consts::FRAC_1_SQRT_2;
        let (x, y) = vertices[0].meters();
        assert_relative_eq!(x, 1000.0 + offset, epsilon = 1e-6);
        assert_relative_eq!(y, 2000.0 - offset, epsilon = 1e-6);

        for vertex in &vertices {
            let (x, y) = vertex.meters();
            assert_relative_eq!((x - 1000.0).hypot(y - 2000.0), 100.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn default_style_is_wide() {
        assert_eq!(VectorLayer::default().style().stroke_width, 4.0);
    }
}
