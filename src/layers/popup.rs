use serde::{Deserialize, Serialize};

use crate::Mercator;

/// Identifies a [`Popup`] within its [`PopupLayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PopupId(u64);

/// Pixel size of a popup frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopupSize {
    pub width: f32,
    pub height: f32,
}

impl PopupSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A framed bubble anchored above a map position, closable by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub id: PopupId,
    pub position: Mercator,
    pub size: PopupSize,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct PopupLayer {
    popups: Vec<Popup>,
    next_id: u64,
}

impl PopupLayer {
    pub fn add(&mut self, position: Mercator, size: PopupSize, content: String) -> PopupId {
        let id = PopupId(self.next_id);
        self.next_id += 1;
        self.popups.push(Popup {
            id,
            position,
            size,
            content,
        });
        id
    }

    pub fn get(&self, id: PopupId) -> Option<&Popup> {
        self.popups.iter().find(|popup| popup.id == id)
    }

    pub fn remove(&mut self, id: PopupId) -> Option<Popup> {
        let index = self.popups.iter().position(|popup| popup.id == id)?;
        Some(self.popups.remove(index))
    }

    pub fn clear(&mut self) -> usize {
        let count = self.popups.len();
        self.popups.clear();
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Popup> {
        self.popups.iter()
    }
}
