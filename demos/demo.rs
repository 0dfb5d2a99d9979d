use iced::{Element, Task, Theme};
use mapfront::{CacheMessage, Icon, MapMessage, MapOptions, MapView, PopupSize, Style, TileId};

const OPTIONS: &str = r#"{
    "center": [-71.0935, 42.3601],
    "defaultZoom": 13,
    "minZoom": 2,
    "maxZoom": 19
}"#;

const PIN: &str = "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-red.png";

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Error)
        .filter_module("mapfront", log::LevelFilter::Debug)
        .init();

    iced::application(Demo::boot, Demo::update, Demo::view)
        .title("Mapfront")
        .theme(Theme::Light)
        .run()
        .unwrap();
}

struct Demo {
    map: MapView,
}

impl Demo {
    fn boot() -> (Self, Task<MapMessage>) {
        let options = MapOptions::from_json(OPTIONS).unwrap();
        let mut map = MapView::new(
            options,
            ["DrawFeature", "Navigation"],
            Some(["GoogleStreets", "GoogleHybrid", "OpenStreetMap"]),
        )
        .unwrap();

        map.set_vector_style(Style {
            stroke_width: 3.0,
            ..Style::default()
        });

        map.add_marker(-71.0935, 42.3601, None);
        map.add_marker(
            -71.0589,
            42.3601,
            Some(Icon::new(PIN, 25.0, 41.0).with_offset(-12.0, -41.0)),
        );

        map.draw_path([
            [-71.1167, 42.3770],
            [-71.0942, 42.3467],
            [-71.0589, 42.3601],
        ])
        .unwrap();
        map.draw_polygon(-71.0810, 42.3656, 600.0, 6).unwrap();

        map.add_popup(
            -71.0589,
            42.3601,
            PopupSize::new(180.0, 80.0),
            "<b>Boston</b><br>Drag the map, scroll to zoom.",
        );

        log::info!(
            "showing {} in {}",
            map.bounds_string(),
            map.display_projection().code()
        );

        // Something to fall back on while the first tiles load
        let task = Task::batch([
            Task::done(MapMessage::Tiles(0, CacheMessage::Load { id: TileId::ZERO })),
            map.fetch_icons(),
        ]);

        (Self { map }, task)
    }

    fn update(&mut self, message: MapMessage) -> Task<MapMessage> {
        self.map.update(message)
    }

    fn view(&self) -> Element<'_, MapMessage> {
        self.map.view()
    }
}
