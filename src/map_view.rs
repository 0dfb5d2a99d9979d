use std::{fmt::Display, str::FromStr, sync::Arc};

use iced::{Point, Rectangle, Size, Task};

use crate::{
    Bounds, CacheMessage, Control, Coordinate, Error, MapOptions, Mercator, Projection, Projector,
    Result, TileCache, Viewpoint, Zoom,
    fetcher::Fetcher,
    icon_cache::{IconCache, IconMessage},
    layers::{
        Feature, FeatureId, Geometry, Icon, Marker, MarkerId, MarkerLayer, Popup, PopupId,
        PopupLayer, PopupSize, Style, VectorLayer, regular_polygon,
    },
    sources::BaseLayer,
};

/// Messages a [`MapView`] produces from its widgets and background fetches.
/// Route them back into [`MapView::update`].
#[derive(Debug, Clone)]
pub enum MapMessage {
    /// Tile cache traffic of the base layer at the given index.
    Tiles(usize, CacheMessage),
    Icon(IconMessage),
    /// The viewpoint or the size of the map changed.
    Moved(Projector),
    Clicked(Mercator),
    ClosePopup(PopupId),
    SelectBaseLayer(usize),
    SelectControl(Control),
}

pub(crate) struct TileLayer {
    pub(crate) kind: BaseLayer,
    pub(crate) tiles: TileCache,
}

/// An interactive map holding markers, drawn features and popups.
///
/// All coordinates passed in or handed out are in the display projection
/// chosen in [`MapOptions`], and are reprojected to [`Mercator`] exactly once
/// on the way in, and back on the way out.
pub struct MapView {
    pub(crate) viewpoint: Viewpoint,
    /// Pixel size of the map, as last reported by the widget.
    pub(crate) viewport: Size,
    pub(crate) min_zoom: Zoom,
    pub(crate) max_zoom: Zoom,
    display_projection: Projection,
    pub(crate) base_layers: Vec<TileLayer>,
    pub(crate) active_layer: usize,
    pub(crate) controls: Vec<Control>,
    pub(crate) active_control: Option<Control>,
    pub(crate) markers: MarkerLayer,
    pub(crate) vectors: VectorLayer,
    pub(crate) popups: PopupLayer,
    pub(crate) icons: IconCache,
}

impl MapView {
    /// Build a map from its options, the names of the toolbar controls and the
    /// names of the base layers.
    ///
    /// Unknown names are skipped. When `base_layers` is `None` the map shows
    /// Google streets, while an empty list leaves it without base layers. The
    /// first control becomes the active tool.
    pub fn new<C, L>(options: MapOptions, controls: C, base_layers: Option<L>) -> Result<Self>
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        let (min_zoom, max_zoom, zoom) = options.zoom_limits()?;
        let fetcher = Arc::new(Fetcher::new()?);

        let kinds: Vec<BaseLayer> = match base_layers {
            Some(names) => parse_known(names),
            None => vec![BaseLayer::GoogleStreets],
        };
        let base_layers: Vec<TileLayer> = kinds
            .into_iter()
            .map(|kind| TileLayer {
                kind,
                tiles: TileCache::new(kind.source(), fetcher.clone()),
            })
            .collect();

        let controls: Vec<Control> = parse_known(controls);
        let display_projection = options.display_projection;
        let [width, height] = options.viewport;

        log::debug!(
            "map with base layers {:?} and controls {:?}",
            base_layers.iter().map(|layer| layer.kind).collect::<Vec<_>>(),
            controls
        );

        Ok(Self {
            viewpoint: Viewpoint {
                position: display_projection.to_mercator(options.center),
                zoom,
            },
            viewport: Size::new(width, height),
            min_zoom,
            max_zoom,
            display_projection,
            base_layers,
            active_layer: 0,
            active_control: controls.first().copied(),
            controls,
            markers: MarkerLayer::default(),
            vectors: VectorLayer::default(),
            popups: PopupLayer::default(),
            icons: IconCache::new(fetcher),
        })
    }

    pub fn display_projection(&self) -> Projection {
        self.display_projection
    }

    pub fn viewpoint(&self) -> Viewpoint {
        self.viewpoint
    }

    pub fn base_layers(&self) -> impl Iterator<Item = BaseLayer> + '_ {
        self.base_layers.iter().map(|layer| layer.kind)
    }

    pub fn active_base_layer(&self) -> Option<BaseLayer> {
        self.base_layers.get(self.active_layer).map(|layer| layer.kind)
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn active_control(&self) -> Option<Control> {
        self.active_control
    }

    // Markers

    /// Place a marker, drawn with `icon` or a default dot without one.
    pub fn add_marker(&mut self, x: f64, y: f64, icon: Option<Icon>) -> MarkerId {
        let position = self.internal(x, y);
        if let Some(icon) = &icon {
            self.icons.request(&icon.url);
        }
        self.markers.add(position, icon)
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> Option<Marker> {
        self.markers.remove(id)
    }

    pub fn clear_markers(&mut self) {
        let count = self.markers.clear();
        log::debug!("cleared {count} markers");
    }

    // Vectors

    /// Remove the given features, or every feature when `None`.
    pub fn clear_vectors(&mut self, features: Option<&[FeatureId]>) {
        let count = match features {
            Some(ids) => self.vectors.remove(ids),
            None => self.vectors.clear(),
        };
        log::debug!("cleared {count} features");
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.vectors.get(id)
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.vectors.iter()
    }

    /// Style used for every drawn feature.
    pub fn set_vector_style(&mut self, style: Style) {
        self.vectors.set_style(style);
    }

    pub fn draw_point(&mut self, x: f64, y: f64) -> FeatureId {
        let position = self.internal(x, y);
        self.vectors.add(Geometry::Point(position))
    }

    /// Draw a line through at least two display coordinates.
    pub fn draw_path<I>(&mut self, coordinates: I) -> Result<FeatureId>
    where
        I: IntoIterator,
        I::Item: Into<Coordinate>,
    {
        let vertices: Vec<Mercator> = coordinates
            .into_iter()
            .map(|coordinate| self.display_projection.to_mercator(coordinate.into()))
            .collect();

        if vertices.len() < 2 {
            return Err(Error::PathTooShort(vertices.len()));
        }
        Ok(self.vectors.add(Geometry::LineString(vertices)))
    }

    /// Draw a regular polygon with `sides` corners around a display coordinate.
    /// The `radius` is measured in projected meters.
    pub fn draw_polygon(&mut self, x: f64, y: f64, radius: f64, sides: u32) -> Result<FeatureId> {
        if sides < 3 {
            return Err(Error::TooFewSides(sides));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidRadius(radius));
        }

        let center = self.internal(x, y);
        let vertices = regular_polygon(center, radius, sides);
        Ok(self.vectors.add(Geometry::Polygon(vertices)))
    }

    // Popups

    /// Open a framed popup of `size` pixels above a display coordinate.
    /// Markup in `html` is shown as plain text.
    pub fn add_popup(
        &mut self,
        x: f64,
        y: f64,
        size: PopupSize,
        html: impl Into<String>,
    ) -> PopupId {
        let position = self.internal(x, y);
        self.popups.add(position, size, html.into())
    }

    pub fn popup(&self, id: PopupId) -> Option<&Popup> {
        self.popups.get(id)
    }

    pub fn popups(&self) -> impl Iterator<Item = &Popup> {
        self.popups.iter()
    }

    pub fn remove_popup(&mut self, id: PopupId) -> Option<Popup> {
        self.popups.remove(id)
    }

    pub fn clear_popups(&mut self) {
        let count = self.popups.clear();
        log::debug!("cleared {count} popups");
    }

    // Viewport

    /// Zoom to `level`, limited to the zoom range of the map.
    pub fn set_zoom(&mut self, level: f64) {
        if level.is_nan() {
            log::warn!("ignoring zoom level NaN");
            return;
        }

        let mut zoom = Zoom::MIN;
        zoom.zoom_by(level);
        self.viewpoint.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    pub fn zoom(&self) -> f64 {
        self.viewpoint.zoom.f64()
    }

    /// Center the map on a display coordinate. Positions outside the square
    /// Mercator world are moved onto its edge, so latitudes are limited to
    /// about ±85.05° and longitudes to ±180°.
    pub fn set_center(&mut self, x: f64, y: f64) {
        let position = self.internal(x, y);
        self.viewpoint.move_to_mercator(position);
    }

    pub fn center(&self) -> Coordinate {
        self.display_projection.to_display(self.viewpoint.position)
    }

    /// Move the map to a display coordinate, keeping the zoom level.
    pub fn pan_to(&mut self, x: f64, y: f64) {
        self.set_center(x, y);
    }

    /// The visible extent in display coordinates.
    pub fn bounds(&self) -> Bounds {
        let projector = Projector {
            viewpoint: self.viewpoint,
            cursor: None,
            bounds: Rectangle::new(Point::ORIGIN, self.viewport),
        };

        let top_left = projector.screen_space_into_mercator(Point::ORIGIN);
        let bottom_right = projector
            .screen_space_into_mercator(Point::new(self.viewport.width, self.viewport.height));

        let projection = self.display_projection;
        Bounds::from_corners(
            projection.to_display(top_left),
            projection.to_display(bottom_right),
        )
    }

    /// The visible extent as `left,bottom,right,top`.
    pub fn bounds_string(&self) -> String {
        self.bounds().to_string()
    }

    // Coordinates

    pub fn coordinate(&self, x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    /// Reproject projected meters (EPSG:900913) into display coordinates.
    pub fn to_display(&self, x: f64, y: f64) -> Coordinate {
        self.display_projection.to_display(Mercator::from_meters(x, y))
    }

    /// Reproject display coordinates into projected meters (EPSG:900913).
    pub fn to_internal(&self, x: f64, y: f64) -> Coordinate {
        self.internal(x, y).meters().into()
    }

    fn internal(&self, x: f64, y: f64) -> Mercator {
        self.display_projection.to_mercator(self.coordinate(x, y))
    }

    // Runtime

    pub fn update(&mut self, message: MapMessage) -> Task<MapMessage> {
        let task = match message {
            MapMessage::Tiles(index, message) => match self.base_layers.get_mut(index) {
                Some(layer) => layer
                    .tiles
                    .update(message)
                    .map(move |message| MapMessage::Tiles(index, message)),
                None => Task::none(),
            },
            MapMessage::Icon(message) => {
                self.icons.update(message);
                Task::none()
            }
            MapMessage::Moved(projector) => {
                self.viewpoint = projector.viewpoint;
                self.viewport = projector.bounds.size();
                Task::none()
            }
            MapMessage::Clicked(position) => {
                if self.active_control == Some(Control::DrawFeature) {
                    let id = self.vectors.add(Geometry::Point(position));
                    log::debug!("drew point {id:?}");
                }
                Task::none()
            }
            MapMessage::ClosePopup(id) => {
                self.popups.remove(id);
                Task::none()
            }
            MapMessage::SelectBaseLayer(index) => {
                if index < self.base_layers.len() {
                    self.active_layer = index;
                }
                Task::none()
            }
            MapMessage::SelectControl(control) => {
                if self.controls.contains(&control) {
                    self.active_control = Some(control);
                }
                Task::none()
            }
        };

        Task::batch([task, self.fetch_icons()])
    }

    /// Start downloading marker icons which are not loaded yet.
    pub fn fetch_icons(&mut self) -> Task<MapMessage> {
        self.icons.fetch_pending().map(MapMessage::Icon)
    }
}

/// Parse every recognized name, skipping unknown ones and duplicates.
fn parse_known<T, I>(names: I) -> Vec<T>
where
    T: FromStr + PartialEq,
    T::Err: Display,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut known = Vec::new();
    for name in names {
        match name.as_ref().parse::<T>() {
            Ok(value) if !known.contains(&value) => known.push(value),
            Ok(_) => log::debug!("skipping duplicate {:?}", name.as_ref()),
            Err(error) => log::warn!("skipping {error}"),
        }
    }
    known
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn map() -> MapView {
        let options = MapOptions::new([-71.0935, 42.3601]).with_default_zoom(12.0);
        MapView::new(
            options,
            ["DrawFeature", "Navigation"],
            Some(["GoogleStreets", "GoogleHybrid"]),
        )
        .unwrap()
    }

    #[test]
    fn center_round_trip() {
        let mut map = map();
        for (x, y) in [(0.0, 0.0), (-71.0935, 42.3601), (151.2093, -33.8688), (179.0, 80.0)] {
            map.set_center(x, y);
            let center = map.center();
            assert_relative_eq!(center.x, x, epsilon = 1e-9);
            assert_relative_eq!(center.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn center_is_limited_to_the_mercator_square() {
        let max_latitude = std::f64::consts::PI.sinh().atan().to_degrees();
        let mut map = map();

        map.set_center(0.0, 89.0);
        assert_relative_eq!(map.center().y, max_latitude, epsilon = 1e-9);
        map.set_center(0.0, -89.0);
        assert_relative_eq!(map.center().y, -max_latitude, epsilon = 1e-9);

        map.set_center(190.0, 10.0);
        assert_relative_eq!(map.center().x, 180.0, epsilon = 1e-9);
        assert_relative_eq!(map.center().y, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn center_round_trip_in_meters() {
        let options = MapOptions::new([0.0, 0.0]).with_display_projection(Projection::WebMercator);
        let mut map = MapView::new(options, ["Navigation"], Some(["OpenStreetMap"])).unwrap();

        map.set_center(-7_913_950.0, 5_214_600.0);
        let center = map.center();
        assert_relative_eq!(center.x, -7_913_950.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 5_214_600.0, epsilon = 1e-6);
    }

    #[test]
    fn input_is_reprojected_once() {
        let map = map();
        let projected = map.to_internal(2.3522, 48.8566);
        let (easting, northing) = crate::Geographic::new(2.3522, 48.8566).as_mercator().meters();
        assert_relative_eq!(projected.x, easting, epsilon = 1e-6);
        assert_relative_eq!(projected.y, northing, epsilon = 1e-6);

        let display = map.to_display(projected.x, projected.y);
        assert_relative_eq!(display.x, 2.3522, epsilon = 1e-9);
        assert_relative_eq!(display.y, 48.8566, epsilon = 1e-9);
        assert_eq!(map.coordinate(1.0, 2.0), Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn each_draw_adds_one_feature() {
        let mut map = map();

        map.draw_point(-71.09, 42.36);
        assert_eq!(map.features().count(), 1);

        map.draw_path([[-71.09, 42.36], [-71.08, 42.37], [-71.07, 42.35]])
            .unwrap();
        assert_eq!(map.features().count(), 2);

        let polygon = map.draw_polygon(-71.09, 42.36, 500.0, 6).unwrap();
        assert_eq!(map.features().count(), 3);
        assert!(matches!(
            map.feature(polygon).map(|feature| &feature.geometry),
            Some(Geometry::Polygon(vertices)) if vertices.len() == 6
        ));
    }

    #[test]
    fn rejects_degenerate_geometry() {
        let mut map = map();
        assert!(matches!(
            map.draw_path([(0.0, 0.0)]),
            Err(Error::PathTooShort(1))
        ));
        assert!(matches!(
            map.draw_polygon(0.0, 0.0, 10.0, 2),
            Err(Error::TooFewSides(2))
        ));
        assert!(matches!(
            map.draw_polygon(0.0, 0.0, f64::INFINITY, 5),
            Err(Error::InvalidRadius(_))
        ));
        assert_eq!(map.features().count(), 0);
    }

    #[test]
    fn clear_vectors_all_or_subset() {
        let mut map = map();
        let a = map.draw_point(0.0, 0.0);
        let b = map.draw_point(1.0, 1.0);
        let c = map.draw_point(2.0, 2.0);

        map.clear_vectors(Some(&[a, c]));
        assert_eq!(map.features().map(|feature| feature.id).collect::<Vec<_>>(), [b]);

        map.draw_point(3.0, 3.0);
        map.clear_vectors(None);
        assert_eq!(map.features().count(), 0);
    }

    #[test]
    fn clear_markers_leaves_none() {
        let mut map = map();
        map.add_marker(-71.09, 42.36, None);
        let icon = Icon::new("https://example.com/pin.png", 21.0, 25.0).with_offset(-10.0, -25.0);
        let id = map.add_marker(-71.08, 42.37, Some(icon.clone()));

        assert_eq!(map.marker(id).and_then(|marker| marker.icon.as_ref()), Some(&icon));
        assert_eq!(map.markers().count(), 2);

        map.clear_markers();
        assert_eq!(map.markers().count(), 0);
    }

    #[test]
    fn failed_marker_icon_is_fetched_again() {
        let url = "https://example.com/pin.png";
        let mut map = map();
        let id = map.add_marker(-71.08, 42.37, Some(Icon::new(url, 21.0, 25.0)));
        let _ = map.fetch_icons();

        let _ = map.update(MapMessage::Icon(IconMessage::LoadFailed { url: url.into() }));
        assert!(map.marker(id).is_some());
        assert!(map.icons.is_loading(url));
        assert!(map.icons.get(url).is_none());
    }

    #[test]
    fn popups_are_tracked() {
        let mut map = map();
        let size = PopupSize::new(200.0, 100.0);
        let first = map.add_popup(-71.09, 42.36, size, "<p>Hello</p>");
        map.add_popup(-71.08, 42.37, size, "<p>World</p>");
        assert_eq!(map.popup(first).map(|popup| popup.content.as_str()), Some("<p>Hello</p>"));

        let _ = map.update(MapMessage::ClosePopup(first));
        assert_eq!(map.popups().count(), 1);

        map.clear_popups();
        assert_eq!(map.popups().count(), 0);
    }

    #[test]
    fn bounds_string_is_left_bottom_right_top() {
        let options = MapOptions::new([0.0, 0.0])
            .with_default_zoom(2.0)
            .with_viewport(800.0, 600.0);
        let map = MapView::new(options, ["Navigation"], Some(["GoogleStreets"])).unwrap();

        let bounds = map.bounds_string();
        assert_eq!(bounds.matches(',').count(), 3);

        let values: Vec<f64> = bounds.split(',').map(|value| value.parse().unwrap()).collect();
        let [left, bottom, right, top] = values[..] else {
            panic!("expected four values in {bounds}");
        };

        // 400 pixels of a 1024 pixel wide world on either side
        assert_relative_eq!(left, -140.625, epsilon = 1e-9);
        assert_relative_eq!(right, 140.625, epsilon = 1e-9);
        assert!(bottom < 0.0 && top > 0.0);
        assert_relative_eq!(bottom, -top, epsilon = 1e-9);
        assert_eq!(map.bounds(), Bounds { left, bottom, right, top });
    }

    #[test]
    fn bounds_follow_the_reported_viewport() {
        let mut map = map();
        let wide = map.bounds();

        let mut projector = Projector {
            viewpoint: map.viewpoint(),
            cursor: None,
            bounds: Rectangle::new(Point::ORIGIN, Size::new(400.0, 300.0)),
        };
        let _ = map.update(MapMessage::Moved(projector.clone()));
        let narrow = map.bounds();
        assert_relative_eq!(
            (narrow.right - narrow.left) * 2.0,
            wide.right - wide.left,
            epsilon = 1e-9
        );

        projector.viewpoint.zoom = Zoom::try_from(13.0).unwrap();
        let _ = map.update(MapMessage::Moved(projector));
        assert_eq!(map.zoom(), 13.0);
    }

    #[test]
    fn unknown_names_are_skipped() {
        let options = MapOptions::new([0.0, 0.0]);
        let map = MapView::new(
            options,
            ["PanZoomBar", "Navigation", "Navigation"],
            Some(["GoogleSatellite", "GoogleHybrid"]),
        )
        .unwrap();

        assert_eq!(map.base_layers().collect::<Vec<_>>(), [BaseLayer::GoogleHybrid]);
        assert_eq!(map.controls(), [Control::Navigation]);
        assert_eq!(map.active_control(), Some(Control::Navigation));
    }

    #[test]
    fn google_streets_without_layer_names() {
        let map = MapView::new(MapOptions::new([0.0, 0.0]), ["Navigation"], None::<[&str; 0]>)
            .unwrap();
        assert_eq!(map.base_layers().collect::<Vec<_>>(), [BaseLayer::GoogleStreets]);

        let no_layers: Option<Vec<&str>> = Some(Vec::new());
        let map = MapView::new(MapOptions::new([0.0, 0.0]), ["Navigation"], no_layers).unwrap();
        assert_eq!(map.base_layers().count(), 0);
        assert_eq!(map.active_base_layer(), None);

        let map =
            MapView::new(MapOptions::new([0.0, 0.0]), Vec::<&str>::new(), Some(["Bogus"])).unwrap();
        assert_eq!(map.base_layers().count(), 0);
        assert_eq!(map.active_control(), None);
    }

    #[test]
    fn set_zoom_is_limited() {
        let options = MapOptions::new([0.0, 0.0]).with_zoom_range(3.0, 15.0);
        let mut map = MapView::new(options, ["Navigation"], Some(["GoogleStreets"])).unwrap();
        assert_eq!(map.zoom(), 3.0);

        map.set_zoom(9.5);
        assert_eq!(map.zoom(), 9.5);
        map.set_zoom(20.0);
        assert_eq!(map.zoom(), 15.0);
        map.set_zoom(-1.0);
        assert_eq!(map.zoom(), 3.0);
        map.set_zoom(f64::NAN);
        assert_eq!(map.zoom(), 3.0);
    }

    #[test]
    fn pan_keeps_zoom() {
        let mut map = map();
        map.pan_to(10.0, 20.0);
        assert_eq!(map.zoom(), 12.0);
        assert_relative_eq!(map.center().x, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn clicks_draw_with_the_draw_tool() {
        let mut map = map();
        assert_eq!(map.active_control(), Some(Control::DrawFeature));

        let _ = map.update(MapMessage::Clicked(Mercator::new(0.1, -0.2)));
        assert_eq!(map.features().count(), 1);

        let _ = map.update(MapMessage::SelectControl(Control::Navigation));
        let _ = map.update(MapMessage::Clicked(Mercator::new(0.1, -0.2)));
        assert_eq!(map.features().count(), 1);
    }

    #[test]
    fn base_layer_selection_stays_in_range() {
        let mut map = map();
        let _ = map.update(MapMessage::SelectBaseLayer(1));
        assert_eq!(map.active_base_layer(), Some(BaseLayer::GoogleHybrid));

        let _ = map.update(MapMessage::SelectBaseLayer(7));
        assert_eq!(map.active_base_layer(), Some(BaseLayer::GoogleHybrid));
    }

    #[test]
    fn invalid_options_fail() {
        let options = MapOptions::new([0.0, 0.0]).with_zoom_range(10.0, 2.0);
        assert!(matches!(
            MapView::new(options, ["Navigation"], Some(["GoogleStreets"])),
            Err(Error::ZoomRange { .. })
        ));
    }
}
