//! The overlay layers a [`MapView`](crate::MapView) owns: markers, drawn vector features and popups.

mod marker;
mod popup;
mod vector;

pub use marker::{Icon, Marker, MarkerId, MarkerLayer};
pub use popup::{Popup, PopupId, PopupLayer, PopupSize};
pub use vector::{Feature, FeatureId, Geometry, Style, VectorLayer, regular_polygon};
