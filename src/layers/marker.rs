use iced::{Size, Vector};
use serde::{Deserialize, Serialize};

use crate::Mercator;

/// Identifies a [`Marker`] within its [`MarkerLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(u64);

/// Describes the image drawn for a marker, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Icon {
    pub url: String,
    pub width: f32,
    pub height: f32,
    /// Offset of the image's top-left corner from the marker position.
    /// Without one, the image is centered horizontally above the position.
    #[serde(default)]
    pub offset: Option<[f32; 2]>,
}

impl Icon {
    pub fn new(url: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
            offset: None,
        }
    }

    pub fn with_offset(self, dx: f32, dy: f32) -> Self {
        Self {
            offset: Some([dx, dy]),
            ..self
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn offset(&self) -> Vector {
        match self.offset {
            Some([dx, dy]) => Vector::new(dx, dy),
            None => Vector::new(-self.width / 2.0, -self.height),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Mercator,
    pub icon: Option<Icon>,
}

/// Markers in insertion order.
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    next_id: u64,
}

impl MarkerLayer {
    pub fn add(&mut self, position: Mercator, icon: Option<Icon>) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.push(Marker { id, position, icon });
        id
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.id == id)
    }

    pub fn remove(&mut self, id: MarkerId) -> Option<Marker> {
        let index = self.markers.iter().position(|marker| marker.id == id)?;
        Some(self.markers.remove(index))
    }

    /// Remove all markers, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.markers.len();
        self.markers.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }
}
