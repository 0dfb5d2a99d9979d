use serde::{Deserialize, Serialize};

use crate::{Geographic, Mercator};

/// A coordinate pair in the display coordinate system of a map.
/// Depending on the [`Projection`] this is either longitude/latitude
/// in degrees or easting/northing in projected meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coordinate: Coordinate) -> Self {
        [coordinate.x, coordinate.y]
    }
}

/// Coordinate systems a map can use towards its callers. Internally
/// positions are always kept as [`Mercator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Longitude and latitude in degrees.
    #[default]
    #[serde(rename = "EPSG:4326", alias = "WGS84")]
    Wgs84,
    /// Spherical mercator in meters.
    #[serde(rename = "EPSG:900913", alias = "EPSG:3857")]
    WebMercator,
}

impl Projection {
    /// Reproject a display coordinate into the internal representation.
    pub fn to_mercator(&self, coordinate: Coordinate) -> Mercator {
        match self {
            Projection::Wgs84 => Geographic::new(coordinate.x, coordinate.y).as_mercator(),
            Projection::WebMercator => Mercator::from_meters(coordinate.x, coordinate.y),
        }
    }

    /// Reproject an internal position into display coordinates.
    pub fn to_display(&self, position: Mercator) -> Coordinate {
        match self {
            Projection::Wgs84 => {
                let geographic = position.as_geographic();
                Coordinate::new(geographic.longitude(), geographic.latitude())
            }
            Projection::WebMercator => position.meters().into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Projection::Wgs84 => "EPSG:4326",
            Projection::WebMercator => "EPSG:900913",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn wgs84_round_trip() {
        let projection = Projection::Wgs84;
        let coordinate = Coordinate::new(-71.0935, 42.3601);

        let back = projection.to_display(projection.to_mercator(coordinate));
        assert_relative_eq!(back.x, coordinate.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, coordinate.y, epsilon = 1e-9);
    }

    #[test]
    fn web_mercator_is_meters() {
        let projection = Projection::WebMercator;
        let position = projection.to_mercator(Coordinate::new(0.0, 0.0));
        assert_eq!(position, Mercator::new(0.0, 0.0));

        let back = projection.to_display(projection.to_mercator([1000.0, -2000.0].into()));
        assert_relative_eq!(back.x, 1000.0, epsilon = 1e-6);
        assert_relative_eq!(back.y, -2000.0, epsilon = 1e-6);
    }

    #[test]
    fn parses_projection_codes() {
        let parsed: Vec<Projection> =
            serde_json::from_str(r#"["EPSG:4326", "EPSG:900913", "EPSG:3857"]"#).unwrap();
        assert_eq!(
            parsed,
            [Projection::Wgs84, Projection::WebMercator, Projection::WebMercator]
        );
        assert_eq!(Projection::WebMercator.code(), "EPSG:900913");
    }

    #[test]
    fn coordinate_from_pair() {
        let coordinate: Coordinate = serde_json::from_str("[2.35, 48.85]").unwrap();
        assert_eq!(coordinate, Coordinate::new(2.35, 48.85));
        assert_eq!(Coordinate::from((1.0, 2.0)), Coordinate::new(1.0, 2.0));
    }
}
