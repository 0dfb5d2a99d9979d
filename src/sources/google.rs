use super::Source;
use crate::tile::TileId;

const ATTRIBUTION: &str = "Map data © Google";

/// Google road map tiles.
#[derive(Debug)]
pub struct GoogleStreets;

impl Source for GoogleStreets {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://mt1.google.com/vt/lyrs=m&x={}&y={}&z={}",
            tile_id.x(),
            tile_id.y(),
            tile_id.zoom()
        )
    }

    fn attribution(&self) -> &'static str {
        ATTRIBUTION
    }

    fn max_zoom(&self) -> u8 {
        20
    }
}

/// Google satellite imagery with road and label overlay.
#[derive(Debug)]
pub struct GoogleHybrid;

impl Source for GoogleHybrid {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://mt1.google.com/vt/lyrs=y&x={}&y={}&z={}",
            tile_id.x(),
            tile_id.y(),
            tile_id.zoom()
        )
    }

    fn attribution(&self) -> &'static str {
        ATTRIBUTION
    }

    fn max_zoom(&self) -> u8 {
        20
    }
}
