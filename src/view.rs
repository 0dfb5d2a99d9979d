use iced::{
    Background, Border, Color, Element, Length, Shadow, Theme, Vector,
    alignment::{Horizontal, Vertical},
    widget::{button, canvas, column, container, image, radio, row, scrollable, stack, text},
};

use crate::{
    GlobalElement, MapLayers, MapMessage, MapView, MapWidget, VectorOverlay,
    layers::{Marker, Popup},
};

/// Radius of the dot drawn for markers without an icon, or while it loads.
const MARKER_DOT: f32 = 6.0;

/// Gap between a popup and the position it points at.
const POPUP_GAP: f32 = 8.0;

impl MapView {
    pub fn view(&self) -> Element<'_, MapMessage> {
        let tiles = self.base_layers.get(self.active_layer);
        let index = self.active_layer;

        let map = MapWidget::new(
            tiles.map(|layer| &layer.tiles),
            move |message| MapMessage::Tiles(index, message),
            self.viewpoint,
        )
        .zoom_limits(self.min_zoom, self.max_zoom)
        .on_update(MapMessage::Moved)
        .on_click(MapMessage::Clicked);

        let vectors = canvas(VectorOverlay::new(&self.vectors, self.viewpoint))
            .width(Length::Fill)
            .height(Length::Fill);

        let children = self
            .markers
            .iter()
            .map(|marker| self.marker_element(marker))
            .chain(self.popups.iter().map(popup_element))
            .collect();

        let layers = MapLayers::new(stack![map, vectors], self.viewpoint, children);

        let mut header = row![].spacing(10).align_y(Vertical::Center);
        if !self.controls.is_empty() {
            header = header.push(self.toolbar());
        }
        if self.base_layers.len() > 1 {
            header = header.push(container(self.layer_switcher()).align_right(Length::Fill));
        }

        let mut content = column![header.padding(5), layers];
        if let Some(layer) = tiles {
            let attribution = layer.tiles.attribution();
            content = content.push(
                container(text(attribution).size(11))
                    .align_right(Length::Fill)
                    .padding([2, 5]),
            );
        }

        content.into()
    }

    fn toolbar(&self) -> Element<'_, MapMessage> {
        let buttons = self.controls.iter().map(|&control| {
            let style: fn(&Theme, button::Status) -> button::Style =
                if self.active_control == Some(control) {
                    button::primary
                } else {
                    button::secondary
                };

            button(text(control.label()).size(13))
                .on_press(MapMessage::SelectControl(control))
                .style(style)
                .into()
        });

        row(buttons).spacing(4).into()
    }

    fn layer_switcher(&self) -> Element<'_, MapMessage> {
        let options = self.base_layers.iter().enumerate().map(|(index, layer)| {
            radio(
                layer.kind.title(),
                index,
                Some(self.active_layer),
                MapMessage::SelectBaseLayer,
            )
            .size(14)
            .text_size(13)
            .into()
        });

        row(options).spacing(10).into()
    }

    fn marker_element<'a>(
        &'a self,
        marker: &'a Marker,
    ) -> GlobalElement<'a, MapMessage, Theme, iced::Renderer> {
        let loaded = marker
            .icon
            .as_ref()
            .and_then(|icon| Some((icon, self.icons.get(&icon.url)?)));

        match loaded {
            Some((icon, handle)) => {
                let size = icon.size();
                let element = image(handle.clone()).width(size.width).height(size.height);

                // The icon offset moves its top left corner away from the position
                GlobalElement::new(element, marker.position)
                    .align(Horizontal::Left, Vertical::Top)
                    .offset(icon.offset())
            }
            None => {
                let dot = container(text(""))
                    .width(MARKER_DOT * 2.0)
                    .height(MARKER_DOT * 2.0)
                    .style(|_theme: &Theme| container::Style {
                        background: Some(Background::Color(Color::from_rgb8(0xee, 0x99, 0x00))),
                        border: Border {
                            color: Color::WHITE,
                            width: 2.0,
                            radius: MARKER_DOT.into(),
                        },
                        ..container::Style::default()
                    });

                GlobalElement::new(dot, marker.position)
            }
        }
    }
}

fn popup_element(popup: &Popup) -> GlobalElement<'_, MapMessage, Theme, iced::Renderer> {
    let close = button(text("×").size(14))
        .on_press(MapMessage::ClosePopup(popup.id))
        .style(button::text)
        .padding([0, 4]);

    let body = column![
        container(close).align_right(Length::Fill),
        scrollable(text(strip_markup(&popup.content)).size(13)),
    ]
    .spacing(2);

    let frame = container(body)
        .width(popup.size.width)
        .height(popup.size.height)
        .padding(6)
        .style(|theme| {
            container::rounded_box(theme)
                .shadow(Shadow {
                    color: Color::BLACK,
                    offset: Vector::new(0.0, 2.0),
                    blur_radius: 4.0,
                })
                .border(Border::default().rounded(5.0))
        });

    GlobalElement::new(frame, popup.position)
        .align(Horizontal::Center, Vertical::Bottom)
        .offset(Vector::new(0.0, -POPUP_GAP))
}

/// Drop markup tags and decode the common entities, keeping line breaks
/// for `<br>` and block level closing tags.
fn strip_markup(html: &str) -> String {
    let mut plain = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        plain.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            rest = &rest[start..];
            break;
        };

        let tag = rest[start + 1..start + end].trim().to_ascii_lowercase();
        let name = tag.trim_end_matches('/').trim();
        if matches!(name, "br" | "/p" | "/div" | "/li" | "/h1" | "/h2" | "/h3" | "/tr")
            && !plain.ends_with('\n')
            && !plain.is_empty()
        {
            plain.push('\n');
        }
        rest = &rest[start + end + 1..];
    }
    plain.push_str(rest);

    let plain = plain
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    plain.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::strip_markup;

    #[test]
    fn markup_becomes_text() {
        assert_eq!(strip_markup("<b>Boston</b> harbor"), "Boston harbor");
        assert_eq!(
            strip_markup("<p>First</p><p>Second<br/>line</p>"),
            "First\nSecond\nline"
        );
        assert_eq!(strip_markup("Fish &amp; chips &lt;3"), "Fish & chips <3");
        assert_eq!(strip_markup("dangling <b"), "dangling <b");
    }
}
