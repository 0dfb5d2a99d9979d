//! An interactive slippy map for [iced](https://iced.rs) applications, with
//! selectable base layers, markers, drawn features and popups.

mod bounds;
mod control;
mod draw_cache;
mod error;
mod fetcher;
mod global_element;
mod icon_cache;
mod map_layers;
mod map_view;
mod map_widget;
mod options;
mod overlay;
mod position;
mod projection;
mod projector;
mod tile;
mod tile_cache;
mod view;
mod viewpoint;
mod zoom;

pub mod layers;
pub mod sources;

pub use bounds::Bounds;
pub use control::{Control, UnknownControl};
pub use error::{Error, Result};
pub use global_element::GlobalElement;
pub use icon_cache::IconMessage;
pub use layers::{
    Feature, FeatureId, Geometry, Icon, Marker, MarkerId, Popup, PopupId, PopupSize, Style,
};
pub use map_layers::MapLayers;
pub use map_view::{MapMessage, MapView};
pub use map_widget::MapWidget;
pub use options::MapOptions;
pub use overlay::VectorOverlay;
pub use position::{Geographic, Mercator};
pub use projection::{Coordinate, Projection};
pub use projector::Projector;
pub use sources::BaseLayer;
pub use tile::TileId;
pub use tile_cache::{CacheMessage, TileCache};
pub use viewpoint::Viewpoint;
pub use zoom::{InvalidZoom, Zoom};
