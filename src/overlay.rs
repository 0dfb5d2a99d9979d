use iced::widget::canvas::{self, Frame, Geometry as CanvasGeometry, Path, Stroke};
use iced::{Point, Rectangle, Renderer, Theme, mouse};

use crate::{
    Projector, Viewpoint,
    layers::{Geometry, VectorLayer},
};

/// Canvas program drawing the features of a [`VectorLayer`] on top of the map tiles.
pub struct VectorOverlay<'a> {
    layer: &'a VectorLayer,
    viewpoint: Viewpoint,
}

impl<'a> VectorOverlay<'a> {
    pub fn new(layer: &'a VectorLayer, viewpoint: Viewpoint) -> Self {
        Self { layer, viewpoint }
    }
}

impl<Message> canvas::Program<Message> for VectorOverlay<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<CanvasGeometry> {
        if self.layer.is_empty() {
            return Vec::new();
        }

        let projector = Projector {
            viewpoint: self.viewpoint,
            cursor: None,
            bounds: Rectangle::new(Point::ORIGIN, bounds.size()),
        };
        let style = self.layer.style();
        let stroke = Stroke::default()
            .with_width(style.stroke_width)
            .with_color(style.stroke_color);

        let mut frame = Frame::new(renderer, bounds.size());
        for feature in self.layer.iter() {
            match &feature.geometry {
                Geometry::Point(position) => {
                    let center = projector.mercator_into_screen_space(*position);
                    let circle = Path::circle(center, style.point_radius);
                    frame.fill(&circle, style.fill_color);
                    frame.stroke(&circle, stroke);
                }
                Geometry::LineString(vertices) => {
                    frame.stroke(&ring(&projector, vertices, false), stroke);
                }
                Geometry::Polygon(vertices) => {
                    let polygon = ring(&projector, vertices, true);
                    frame.fill(&polygon, style.fill_color);
                    frame.stroke(&polygon, stroke);
                }
            }
        }

        vec![frame.into_geometry()]
    }
}

fn ring(projector: &Projector, vertices: &[crate::Mercator], close: bool) -> Path {
    Path::new(|builder| {
        let mut points = vertices
            .iter()
            .map(|vertex| projector.mercator_into_screen_space(*vertex));

        if let Some(first) = points.next() {
            builder.move_to(first);
            points.for_each(|point| builder.line_to(point));
            if close {
                builder.close();
            }
        }
    })
}
