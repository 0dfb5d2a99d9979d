use iced::{
    Element, Point, Size, Vector,
    alignment::{Horizontal, Vertical},
};

use crate::Mercator;

/// An [`Element`] pinned to a [`Mercator`] position on the map, which moves along
/// when the map is dragged or zoomed.
pub struct GlobalElement<'a, Message, Theme, Renderer> {
    pub element: Element<'a, Message, Theme, Renderer>,
    pub position: Mercator,
    /// Which side of the element touches the position.
    pub horizontal_alignment: Horizontal,
    pub vertical_alignment: Vertical,
    /// Pixel offset applied after alignment.
    pub offset: Vector,
}

impl<'a, Message, Theme, Renderer> GlobalElement<'a, Message, Theme, Renderer> {
    /// Centered on `position`.
    pub fn new(
        element: impl Into<Element<'a, Message, Theme, Renderer>>,
        position: Mercator,
    ) -> Self {
        Self {
            element: element.into(),
            position,
            horizontal_alignment: Horizontal::Center,
            vertical_alignment: Vertical::Center,
            offset: Vector::ZERO,
        }
    }

    pub fn align(self, horizontal: Horizontal, vertical: Vertical) -> Self {
        Self {
            horizontal_alignment: horizontal,
            vertical_alignment: vertical,
            ..self
        }
    }

    pub fn offset(self, offset: Vector) -> Self {
        Self { offset, ..self }
    }

    /// Where the top left corner of an element of `size` goes, when its
    /// position is at `anchor` on screen.
    pub(crate) fn top_left(&self, anchor: Point, size: Size) -> Point {
        let x = match self.horizontal_alignment {
            Horizontal::Left => anchor.x,
            Horizontal::Center => anchor.x - size.width / 2.0,
            Horizontal::Right => anchor.x - size.width,
        };
        let y = match self.vertical_alignment {
            Vertical::Top => anchor.y,
            Vertical::Center => anchor.y - size.height / 2.0,
            Vertical::Bottom => anchor.y - size.height,
        };

        Point::new(x, y) + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::widget::text;

    fn element() -> GlobalElement<'static, (), iced::Theme, iced::Renderer> {
        GlobalElement::new(text("pin"), Mercator::new(0.0, 0.0))
    }

    #[test]
    fn alignment_picks_the_touching_side() {
        let anchor = Point::new(100.0, 100.0);
        let size = Size::new(20.0, 40.0);

        assert_eq!(element().top_left(anchor, size), Point::new(90.0, 80.0));

        let popup = element().align(Horizontal::Center, Vertical::Bottom);
        assert_eq!(popup.top_left(anchor, size), Point::new(90.0, 60.0));

        let icon = element()
            .align(Horizontal::Left, Vertical::Top)
            .offset(Vector::new(-10.0, -40.0));
        assert_eq!(icon.top_left(anchor, size), Point::new(90.0, 60.0));
    }
}
