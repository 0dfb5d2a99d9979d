//! HTTP tile sources usable as base layers. Make sure you follow terms of usage of the particular source.

mod google;
mod openstreetmap;

use std::{fmt, str::FromStr};

use crate::tile::TileId;
pub use google::{GoogleHybrid, GoogleStreets};
pub use openstreetmap::OpenStreetMap;

/// Remote tile server definition, source for the [`crate::TileCache`].
pub trait Source: fmt::Debug + Send + Sync {
    fn tile_url(&self, tile_id: TileId) -> String;
    /// Credit line shown below the map.
    fn attribution(&self) -> &'static str;

    fn max_zoom(&self) -> u8 {
        19
    }
}

/// The base layers a map can be built with, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseLayer {
    GoogleStreets,
    GoogleHybrid,
    OpenStreetMap,
}

/// The name does not match any [`BaseLayer`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown base layer {0:?}")]
pub struct UnknownBaseLayer(pub String);

impl BaseLayer {
    /// The human readable title shown in the layer switcher.
    pub fn title(&self) -> &'static str {
        match self {
            BaseLayer::GoogleStreets => "Google Streets",
            BaseLayer::GoogleHybrid => "Google Hybrid",
            BaseLayer::OpenStreetMap => "OpenStreetMap",
        }
    }

    pub fn source(&self) -> Box<dyn Source> {
        match self {
            BaseLayer::GoogleStreets => Box::new(GoogleStreets),
            BaseLayer::GoogleHybrid => Box::new(GoogleHybrid),
            BaseLayer::OpenStreetMap => Box::new(OpenStreetMap),
        }
    }
}

impl FromStr for BaseLayer {
    type Err = UnknownBaseLayer;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "GoogleStreets" => Ok(BaseLayer::GoogleStreets),
            "GoogleHybrid" => Ok(BaseLayer::GoogleHybrid),
            "OpenStreetMap" => Ok(BaseLayer::OpenStreetMap),
            _ => Err(UnknownBaseLayer(name.to_owned())),
        }
    }
}

impl fmt::Display for BaseLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names() {
        assert_eq!("GoogleStreets".parse(), Ok(BaseLayer::GoogleStreets));
        assert_eq!("GoogleHybrid".parse(), Ok(BaseLayer::GoogleHybrid));
        assert_eq!(
            "GoogleSatellite".parse::<BaseLayer>(),
            Err(UnknownBaseLayer("GoogleSatellite".into()))
        );

        let layers = [
            BaseLayer::GoogleStreets,
            BaseLayer::GoogleHybrid,
            BaseLayer::OpenStreetMap,
        ];
        for layer in layers {
            assert_eq!(format!("{layer:?}").parse(), Ok(layer));
        }
    }

    #[test]
    fn tile_urls() {
        let tile = TileId::new(3, 5, 4);
        assert_eq!(
            BaseLayer::GoogleStreets.source().tile_url(tile),
            "https://mt1.google.com/vt/lyrs=m&x=3&y=5&z=4"
        );
        assert_eq!(
            BaseLayer::GoogleHybrid.source().tile_url(tile),
            "https://mt1.google.com/vt/lyrs=y&x=3&y=5&z=4"
        );
        assert_eq!(
            BaseLayer::OpenStreetMap.source().tile_url(tile),
            "https://tile.openstreetmap.org/4/3/5.png"
        );
    }
}
