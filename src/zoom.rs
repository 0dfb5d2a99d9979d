/// The given zoom level is not finite, or outside of [`Zoom::MIN`]..=[`Zoom::MAX`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("invalid zoom level {0}, expected a value between 0 and 22")]
pub struct InvalidZoom(pub f64);

/// A continuous zoom level. Level 0 shows the whole world in a single tile,
/// and each level above doubles the scale.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Zoom(f64);

impl Zoom {
    pub const MIN: Zoom = Zoom(0.0);
    pub const MAX: Zoom = Zoom(22.0);

    pub fn f64(&self) -> f64 {
        self.0
    }

    /// Zoom in (positive) or out (negative), saturating at the supported range.
    pub fn zoom_by(&mut self, amount: f64) {
        self.0 = (self.0 + amount).clamp(Self::MIN.0, Self::MAX.0);
    }

    pub fn clamp(self, min: Zoom, max: Zoom) -> Zoom {
        Zoom(self.0.clamp(min.0, max.0))
    }

    /// The discrete tile level to fetch for this zoom, limited by what a source offers.
    pub fn tile_level(&self, max_level: u8) -> u8 {
        self.0.round().min(max_level as f64) as u8
    }
}

impl TryFrom<f64> for Zoom {
    type Error = InvalidZoom;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Zoom(value))
        } else {
            Err(InvalidZoom(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(Zoom::try_from(-0.5).is_err());
        assert!(Zoom::try_from(22.5).is_err());
        assert!(Zoom::try_from(f64::NAN).is_err());
        assert_eq!(Zoom::try_from(12.0).map(|zoom| zoom.f64()), Ok(12.0));
    }

    #[test]
    fn zoom_by_saturates() {
        let mut zoom = Zoom::try_from(21.0).unwrap();
        zoom.zoom_by(5.0);
        assert_eq!(zoom, Zoom::MAX);

        zoom.zoom_by(-30.0);
        assert_eq!(zoom, Zoom::MIN);
    }

    #[test]
    fn tile_level_rounds_and_limits() {
        assert_eq!(Zoom::try_from(4.4).unwrap().tile_level(19), 4);
        assert_eq!(Zoom::try_from(4.6).unwrap().tile_level(19), 5);
        assert_eq!(Zoom::try_from(21.0).unwrap().tile_level(19), 19);
    }
}
