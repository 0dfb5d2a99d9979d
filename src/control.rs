use std::{fmt, str::FromStr};

/// Tools offered in the map toolbar. Exactly one of the attached tools is
/// active at a time; dragging and scrolling always move the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Clicking the map draws a point on the vector layer.
    DrawFeature,
    /// Clicking the map does nothing, it is only browsed.
    Navigation,
}

/// The name does not match any [`Control`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown control {0:?}")]
pub struct UnknownControl(pub String);

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::DrawFeature => "Draw point",
            Control::Navigation => "Navigate",
        }
    }
}

impl FromStr for Control {
    type Err = UnknownControl;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "DrawFeature" => Ok(Control::DrawFeature),
            "Navigation" => Ok(Control::Navigation),
            _ => Err(UnknownControl(name.to_owned())),
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
