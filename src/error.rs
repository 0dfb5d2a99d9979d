use crate::zoom::InvalidZoom;

/// Everything that can go wrong when building or drawing on a [`MapView`](crate::MapView).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    InvalidZoom(#[from] InvalidZoom),
    #[error("minimum zoom {min} is larger than maximum zoom {max}")]
    ZoomRange { min: f64, max: f64 },
    #[error("default zoom {zoom} is outside of {min}..={max}")]
    DefaultZoomOutOfRange { zoom: f64, min: f64, max: f64 },
    #[error("a path needs at least two points, got {0}")]
    PathTooShort(usize),
    #[error("a polygon needs at least three sides, got {0}")]
    TooFewSides(u32),
    #[error("polygon radius must be finite and not negative, got {0}")]
    InvalidRadius(f64),
    #[error("failed to build the http client")]
    Http(#[from] reqwest::Error),
    #[error("invalid map options")]
    Options(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
