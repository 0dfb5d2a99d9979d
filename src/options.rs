use serde::Deserialize;

use crate::{Coordinate, Error, Projection, Result, Zoom};

/// Options a [`MapView`](crate::MapView) is created with. The JSON form
/// uses camelCase keys, e.g. `{"center": [2.35, 48.85], "defaultZoom": 12}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    /// Initial center, in the display projection.
    pub center: Coordinate,
    #[serde(default)]
    pub default_zoom: Option<f64>,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    #[serde(default)]
    pub min_zoom: f64,
    #[serde(default)]
    pub display_projection: Projection,
    /// Pixel size assumed for the viewport until the map has been laid out.
    #[serde(default = "default_viewport")]
    pub viewport: [f32; 2],
}

fn default_max_zoom() -> f64 {
    Zoom::MAX.f64()
}

fn default_viewport() -> [f32; 2] {
    [800.0, 600.0]
}

impl MapOptions {
    pub fn new(center: impl Into<Coordinate>) -> Self {
        Self {
            center: center.into(),
            default_zoom: None,
            max_zoom: default_max_zoom(),
            min_zoom: 0.0,
            display_projection: Projection::default(),
            viewport: default_viewport(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_default_zoom(self, zoom: f64) -> Self {
        Self {
            default_zoom: Some(zoom),
            ..self
        }
    }

    pub fn with_zoom_range(self, min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            ..self
        }
    }

    pub fn with_display_projection(self, projection: Projection) -> Self {
        Self {
            display_projection: projection,
            ..self
        }
    }

    pub fn with_viewport(self, width: f32, height: f32) -> Self {
        Self {
            viewport: [width, height],
            ..self
        }
    }

    /// Check the zoom configuration, returning `(min, max, initial)`.
    /// Without a default zoom the map starts fully zoomed out.
    pub(crate) fn zoom_limits(&self) -> Result<(Zoom, Zoom, Zoom)> {
        let min = Zoom::try_from(self.min_zoom)?;
        let max = Zoom::try_from(self.max_zoom)?;
        if min > max {
            return Err(Error::ZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        let initial = match self.default_zoom {
            Some(zoom) if !(self.min_zoom..=self.max_zoom).contains(&zoom) => {
                return Err(Error::DefaultZoomOutOfRange {
                    zoom,
                    min: self.min_zoom,
                    max: self.max_zoom,
                });
            }
            Some(zoom) => Zoom::try_from(zoom)?,
            None => min,
        };

        Ok((min, max, initial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case() {
        let options = MapOptions::from_json(
            r#"{"center": [-71.09, 42.36], "defaultZoom": 13, "maxZoom": 18, "minZoom": 3}"#,
        )
        .unwrap();

        assert_eq!(options.center, Coordinate::new(-71.09, 42.36));
        assert_eq!(options.default_zoom, Some(13.0));
        assert_eq!(options.max_zoom, 18.0);
        assert_eq!(options.min_zoom, 3.0);
        assert_eq!(options.display_projection, Projection::Wgs84);
        assert_eq!(options.viewport, [800.0, 600.0]);
    }

    #[test]
    fn center_is_required() {
        assert!(matches!(
            MapOptions::from_json(r#"{"defaultZoom": 3}"#),
            Err(Error::Options(_))
        ));
    }

    #[test]
    fn validates_zoom_limits() {
        let options = MapOptions::new([0.0, 0.0]);
        let (min, max, initial) = options.zoom_limits().unwrap();
        assert_eq!((min, max, initial), (Zoom::MIN, Zoom::MAX, Zoom::MIN));

        let reversed = MapOptions::new([0.0, 0.0]).with_zoom_range(10.0, 5.0);
        assert!(matches!(reversed.zoom_limits(), Err(Error::ZoomRange { .. })));

        let outside = MapOptions::new([0.0, 0.0])
            .with_zoom_range(2.0, 10.0)
            .with_default_zoom(12.0);
        assert!(matches!(
            outside.zoom_limits(),
            Err(Error::DefaultZoomOutOfRange { .. })
        ));

        let too_deep = MapOptions::new([0.0, 0.0]).with_zoom_range(0.0, 30.0);
        assert!(matches!(too_deep.zoom_limits(), Err(Error::InvalidZoom(_))));
    }
}
