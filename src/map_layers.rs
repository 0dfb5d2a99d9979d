use iced::{Element, Event, Length, Point, Rectangle, Size, Vector};
use iced_core::{
    Clipboard, Layout, Shell, Widget,
    layout::{Limits, Node},
    mouse, overlay, renderer,
    widget::tree::Tree,
};

use crate::{GlobalElement, Projector, Viewpoint};

/// Stacks [`GlobalElement`]s on top of a base map element, each placed at the
/// screen position of its map coordinate. Later children are drawn above
/// earlier ones and see events first.
pub struct MapLayers<'a, Message, Theme, Renderer> {
    base: Element<'a, Message, Theme, Renderer>,
    children: Vec<GlobalElement<'a, Message, Theme, Renderer>>,
    viewpoint: Viewpoint,
}

impl<'a, Message, Theme, Renderer> MapLayers<'a, Message, Theme, Renderer>
where
    Renderer: iced_core::Renderer,
{
    pub fn new(
        base: impl Into<Element<'a, Message, Theme, Renderer>>,
        viewpoint: Viewpoint,
        children: Vec<GlobalElement<'a, Message, Theme, Renderer>>,
    ) -> Self {
        Self {
            base: base.into(),
            children,
            viewpoint,
        }
    }

    /// The base followed by every child, in tree and layout order.
    fn elements(&self) -> impl Iterator<Item = &Element<'a, Message, Theme, Renderer>> {
        std::iter::once(&self.base).chain(self.children.iter().map(|child| &child.element))
    }

    fn elements_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Element<'a, Message, Theme, Renderer>> {
        std::iter::once(&mut self.base)
            .chain(self.children.iter_mut().map(|child| &mut child.element))
    }
}

/// Children entirely outside the map are neither drawn nor sent events.
/// The base (index 0) always is.
fn is_visible(index: usize, layout: Layout<'_>, map_bounds: Rectangle) -> bool {
    index == 0 || layout.bounds().intersects(&map_bounds)
}

impl<'a, Message, Theme, Renderer> Widget<Message, Theme, Renderer>
    for MapLayers<'a, Message, Theme, Renderer>
where
    Renderer: iced_core::Renderer,
{
    fn size(&self) -> Size<Length> {
        self.base.as_widget().size()
    }

    fn layout(&mut self, tree: &mut Tree, renderer: &Renderer, limits: &Limits) -> Node {
        let Some((base_tree, child_trees)) = tree.children.split_first_mut() else {
            return Node::new(limits.max());
        };

        let base_node = self.base.as_widget_mut().layout(base_tree, renderer, limits);
        let size = base_node.size();

        // Children are positioned relative to the origin of this widget
        let projector = Projector {
            viewpoint: self.viewpoint,
            cursor: None,
            bounds: Rectangle::new(Point::ORIGIN, size),
        };
        let child_limits = Limits::new(Size::ZERO, limits.max());

        let mut nodes = vec![base_node];
        for (child, child_tree) in self.children.iter_mut().zip(child_trees) {
            let node = child
                .element
                .as_widget_mut()
                .layout(child_tree, renderer, &child_limits);

            let anchor = projector.mercator_into_screen_space(child.position);
            let top_left = child.top_left(anchor, node.size());
            nodes.push(node.move_to(top_left));
        }

        Node::with_children(size, nodes)
    }

    fn children(&self) -> Vec<Tree> {
        self.elements().map(Tree::new).collect()
    }

    fn diff(&self, tree: &mut Tree) {
        let elements: Vec<_> = self.elements().collect();
        tree.diff_children(&elements);
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        renderer: &Renderer,
        clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();
        let layers: Vec<_> = self
            .elements_mut()
            .zip(&mut tree.children)
            .zip(layout.children())
            .enumerate()
            .collect();

        // Topmost first, so markers and popups can capture events before the map
        for (index, ((element, state), layout)) in layers.into_iter().rev() {
            if !is_visible(index, layout, bounds) {
                continue;
            }

            element.as_widget_mut().update(
                state, event, layout, cursor, renderer, clipboard, shell, viewport,
            );

            if shell.is_event_captured() {
                return;
            }
        }
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
        renderer: &Renderer,
    ) -> mouse::Interaction {
        let bounds = layout.bounds();
        let layers: Vec<_> = self
            .elements()
            .zip(&tree.children)
            .zip(layout.children())
            .enumerate()
            .collect();

        layers
            .into_iter()
            .rev()
            .filter(|(index, (_, layout))| is_visible(*index, *layout, bounds))
            .map(|(_, ((element, state), layout))| {
                element
                    .as_widget()
                    .mouse_interaction(state, layout, cursor, viewport, renderer)
            })
            .find(|interaction| {
                *interaction != mouse::Interaction::Idle
                    && *interaction != mouse::Interaction::default()
            })
            .unwrap_or(mouse::Interaction::Idle)
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        style: &renderer::Style,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();

        // Clipped, so children partly outside the map do not spill over
        renderer.with_layer(bounds, |renderer| {
            let layers = self.elements().zip(&tree.children).zip(layout.children());
            for (index, ((element, state), layout)) in layers.enumerate() {
                if is_visible(index, layout, bounds) {
                    element
                        .as_widget()
                        .draw(state, renderer, theme, style, layout, cursor, viewport);
                }
            }
        });
    }

    fn overlay<'b>(
        &'b mut self,
        tree: &'b mut Tree,
        layout: Layout<'b>,
        renderer: &Renderer,
        viewport: &Rectangle,
        translation: Vector,
    ) -> Option<overlay::Element<'b, Message, Theme, Renderer>> {
        let overlays: Vec<_> = self
            .elements_mut()
            .zip(&mut tree.children)
            .zip(layout.children())
            .filter_map(|((element, state), layout)| {
                element
                    .as_widget_mut()
                    .overlay(state, layout, renderer, viewport, translation)
            })
            .collect();

        (!overlays.is_empty()).then(|| overlay::Group::with_children(overlays).overlay())
    }
}

impl<'a, Message, Theme, Renderer> From<MapLayers<'a, Message, Theme, Renderer>>
    for Element<'a, Message, Theme, Renderer>
where
    Message: 'a,
    Theme: 'a,
    Renderer: iced_core::Renderer + 'a,
{
    fn from(layers: MapLayers<'a, Message, Theme, Renderer>) -> Self {
        Element::new(layers)
    }
}
