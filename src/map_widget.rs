use std::collections::{HashMap, hash_map::Entry};

use iced::{Element, Length, Point, Rectangle, Size, mouse};
use iced_core::{
    Clipboard, Image, Layout, Shell, Widget,
    image::Handle,
    layout, renderer,
    widget::tree::{self, Tree},
};

use crate::{
    Mercator, Projector, Viewpoint, Zoom,
    draw_cache::DrawCache,
    position::TILE_SIZE,
    tile::TileId,
    tile_cache::{CacheMessage, TileCache},
};

/// Cursor travel (in pixels) between press and release below which a press counts as a click.
const CLICK_TOLERANCE: f32 = 3.0;

/// A [slippy tile](https://wiki.openstreetmap.org/wiki/Slippy_map) widget
pub struct MapWidget<'a, Message> {
    tiles: Option<&'a TileCache>,
    viewpoint: Viewpoint,
    min_zoom: Zoom,
    max_zoom: Zoom,
    on_cache: Box<dyn Fn(CacheMessage) -> Message + 'a>,
    on_update: Option<Box<dyn Fn(Projector) -> Message + 'a>>,
    on_click: Option<Box<dyn Fn(Mercator) -> Message + 'a>>,
}

impl<'a, Message> MapWidget<'a, Message> {
    /// Without a tile cache only the background is drawn, the map can still be moved.
    pub fn new(
        tiles: Option<&'a TileCache>,
        on_cache: impl Fn(CacheMessage) -> Message + 'a,
        viewpoint: Viewpoint,
    ) -> Self {
        Self {
            tiles,
            viewpoint,
            min_zoom: Zoom::MIN,
            max_zoom: Zoom::MAX,
            on_cache: Box::new(on_cache),
            on_update: None,
            on_click: None,
        }
    }

    /// Restrict zooming with the mouse wheel to `min..=max`.
    pub fn zoom_limits(self, min: Zoom, max: Zoom) -> Self {
        Self {
            min_zoom: min,
            max_zoom: max,
            ..self
        }
    }

    /// This message is emitted when the viewpoint (position/zoom) or the size of the
    /// map changes. Without it the map can not be dragged or zoomed.
    pub fn on_update(self, func: impl Fn(Projector) -> Message + 'a) -> Self {
        Self {
            on_update: Some(Box::new(func)),
            ..self
        }
    }

    /// This message is emitted when a location is left-clicked without dragging
    pub fn on_click(self, func: impl Fn(Mercator) -> Message + 'a) -> Self {
        Self {
            on_click: Some(Box::new(func)),
            ..self
        }
    }

    /// Use [flood fill algorithm](https://en.wikipedia.org/wiki/Flood_fill) to determine
    /// which tiles need to be drawn.
    fn flood_tiles(&self, tiles: &TileCache, viewport: Rectangle) -> Vec<(TileId, Rectangle)> {
        let level = self.viewpoint.zoom.tile_level(tiles.max_zoom());
        let tile_size = TILE_SIZE as f64 * 2f64.powf(self.viewpoint.zoom.f64() - level as f64);

        let central_tile_id = self.viewpoint.position.tile_id(level);
        let map_center = self.viewpoint.snapped_pixel_space();

        let capacity = viewport.area() as f64 / (tile_size * tile_size);
        let mut visited = HashMap::with_capacity(capacity.ceil() as usize + 4);
        Self::flood_tiles_inner(
            viewport,
            central_tile_id,
            map_center,
            tile_size,
            &mut visited,
        );

        visited
            .into_iter()
            .filter_map(|(id, rectangle)| rectangle.map(|rectangle| (id, rectangle)))
            .collect()
    }

    fn flood_tiles_inner(
        viewport: Rectangle,
        tile_id: TileId,
        map_center: Point<f64>,
        tile_size: f64,
        visited: &mut HashMap<TileId, Option<Rectangle>>,
    ) {
        let Entry::Vacant(entry) = visited.entry(tile_id) else {
            return;
        };

        let projected = tile_id.on_viewport(viewport, tile_size, map_center);
        if !viewport.intersects(&projected) {
            entry.insert(None);
            return;
        }
        entry.insert(Some(projected));

        for &neighbor in tile_id.neighbors().iter().flatten() {
            Self::flood_tiles_inner(viewport, neighbor, map_center, tile_size, visited);
        }
    }

    /// The part of `amount` which keeps the zoom within the limits.
    fn limited_zoom_amount(&self, amount: f64) -> f64 {
        let current = self.viewpoint.zoom.f64();
        (current + amount).clamp(self.min_zoom.f64(), self.max_zoom.f64()) - current
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Movement {
    #[default]
    Idle,
    Dragging {
        grabbed: Mercator,
        pressed_at: Point,
        moved: bool,
    },
}

#[derive(Debug, Default)]
struct State {
    movement: Movement,
    /// Bounds at the last published update
    bounds: Rectangle,
}

impl<'a, Message, Theme, Renderer> Widget<Message, Theme, Renderer> for MapWidget<'a, Message>
where
    Renderer: iced_core::image::Renderer<Handle = Handle> + iced_core::Renderer,
{
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::Node::new(limits.max())
    }

    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &iced::Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        _viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();
        let initial_viewpoint = self.viewpoint;
        let state = tree.state.downcast_mut::<State>();
        let navigable = self.on_update.is_some();
        let mut clicked = None;

        if let iced::Event::Mouse(event) = event {
            match event {
                mouse::Event::WheelScrolled { delta } if navigable => {
                    if let Some(cursor_position) = cursor.position_over(bounds) {
                        let amount = match delta {
                            mouse::ScrollDelta::Lines { y, .. } => *y as f64 * 0.5,
                            mouse::ScrollDelta::Pixels { y, .. } => *y as f64 * 0.01,
                        };
                        let amount = self.limited_zoom_amount(amount);
                        self.viewpoint.zoom_on_point(amount, cursor_position, bounds);
                    }
                }
                mouse::Event::ButtonPressed(mouse::Button::Left) => {
                    if let Some(cursor_position) = cursor.position_over(bounds) {
                        state.movement = Movement::Dragging {
                            grabbed: self.viewpoint.position_in_viewport(cursor_position, bounds),
                            pressed_at: cursor_position,
                            moved: false,
                        };
                    }
                }
                mouse::Event::CursorMoved { position } => {
                    if let Movement::Dragging {
                        grabbed,
                        pressed_at,
                        ref mut moved,
                    } = state.movement
                    {
                        *moved |= position.distance(pressed_at) > CLICK_TOLERANCE;

                        if *moved && navigable {
                            // Keep the grabbed location under the cursor
                            let under_cursor =
                                self.viewpoint.position_in_viewport(*position, bounds);
                            let center = self.viewpoint.position;
                            self.viewpoint.position = Mercator::new(
                                center.x() + grabbed.x() - under_cursor.x(),
                                center.y() + grabbed.y() - under_cursor.y(),
                            );
                        }
                    }
                }
                mouse::Event::ButtonReleased(mouse::Button::Left) => {
                    if let Movement::Dragging {
                        grabbed,
                        moved: false,
                        ..
                    } = state.movement
                    {
                        clicked = Some(grabbed);
                    }
                    state.movement = Movement::Idle;
                }
                _ => (),
            }
        }

        if let (Some(position), Some(on_click)) = (clicked, &self.on_click) {
            shell.publish(on_click(position));
            shell.capture_event();
        }

        let moved = self.viewpoint != initial_viewpoint;
        if moved || state.bounds != bounds {
            if moved {
                shell.capture_event();
            }
            shell.request_redraw();
            state.bounds = bounds;

            if let Some(on_update) = &self.on_update {
                shell.publish(on_update(Projector {
                    viewpoint: self.viewpoint,
                    cursor: cursor.position_in(bounds),
                    bounds: Rectangle::new(Point::ORIGIN, bounds.size()),
                }));
            }
        }

        // Enqueue loading of missing tiles
        if let Some(tiles) = self.tiles {
            for (tile_id, _) in self.flood_tiles(tiles, bounds.expand(128.0)) {
                if tiles.should_fetch(&tile_id) {
                    shell.publish((self.on_cache)(CacheMessage::Load { id: tile_id }));
                }
            }
        }
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        let Some(tiles) = self.tiles else {
            return;
        };
        let bounds = layout.bounds();
        let map_center = self.viewpoint.snapped_pixel_space();

        // Missing tiles are covered by the closest loaded lower-zoom tile
        let mut draw_cache = DrawCache::default();
        for (tile_id, rectangle) in self.flood_tiles(tiles, bounds) {
            if let Some(handle) = tiles.get(&tile_id) {
                draw_cache.insert(tile_id, handle.clone(), rectangle);
                continue;
            }

            let mut backup_tile_id = tile_id;
            while let Some(next_tile_id) = backup_tile_id.downsample() {
                backup_tile_id = next_tile_id;
                let Some(handle) = tiles.get(&backup_tile_id) else {
                    continue;
                };

                if !draw_cache.contains(&backup_tile_id) {
                    let zoom_scale = 2u32.pow((tile_id.zoom() - backup_tile_id.zoom()) as u32);
                    let tile_size = rectangle.width as f64 * zoom_scale as f64;
                    let projected = backup_tile_id.on_viewport(bounds, tile_size, map_center);
                    draw_cache.insert(backup_tile_id, handle.clone(), projected);
                }
                break;
            }
        }

        // Tiles are clipped to the map bounds, lowest zoom level first
        renderer.with_layer(bounds, |renderer| {
            for (handle, rectangle) in draw_cache.iter() {
                renderer.draw_image(Image::new(handle.clone()), rectangle, bounds);
            }
        });
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        _layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        match tree.state.downcast_ref::<State>().movement {
            Movement::Dragging { moved: true, .. } => mouse::Interaction::Grabbing,
            _ => mouse::Interaction::Idle,
        }
    }
}

impl<'a, Message: 'a, Theme, Renderer> From<MapWidget<'a, Message>>
    for Element<'a, Message, Theme, Renderer>
where
    Renderer: iced_core::image::Renderer<Handle = Handle> + iced_core::Renderer,
{
    fn from(value: MapWidget<'a, Message>) -> Self {
        Self::new(value)
    }
}
