use super::Source;
use crate::tile::TileId;

/// The standard OpenStreetMap tiles. Heavy use is not allowed, see
/// <https://operations.osmfoundation.org/policies/tiles/>
#[derive(Debug)]
pub struct OpenStreetMap;

impl Source for OpenStreetMap {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://tile.openstreetmap.org/{}/{}/{}.png",
            tile_id.zoom(),
            tile_id.x(),
            tile_id.y()
        )
    }

    fn attribution(&self) -> &'static str {
        "© OpenStreetMap contributors"
    }
}
