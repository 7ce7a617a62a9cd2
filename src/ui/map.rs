use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Plot, PlotPoint, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::{Company, CompanyView};

/// Map centre and zoom level, web-map style (higher zoom = closer).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
}

pub const WORLD_VIEW: Viewport = Viewport {
    lat: 20.0,
    lon: 0.0,
    zoom: 1.5,
};

/// Where the map starts for a continent selection.
pub fn continent_viewport(continent: Option<&str>) -> Viewport {
    let (lat, lon, zoom) = match continent {
        Some("Asia") => (34.0, 100.0, 2.5),
        Some("Europe") => (54.0, 15.0, 3.0),
        Some("North America") => (40.0, -100.0, 3.0),
        Some("South America") => (-15.0, -60.0, 3.0),
        Some("Africa") => (0.0, 20.0, 3.0),
        Some("Oceania") => (-25.0, 140.0, 3.0),
        _ => return WORLD_VIEW,
    };
    Viewport { lat, lon, zoom }
}

impl Viewport {
    /// Longitude degrees visible; the world view shows all 360.
    pub fn lon_span(&self) -> f64 {
        360.0 / 2f64.powf(self.zoom - WORLD_VIEW.zoom)
    }

    /// `[lon, lat]` corners of the visible area.
    pub fn corners(&self) -> ([f64; 2], [f64; 2]) {
        let half_lon = self.lon_span() / 2.0;
        let half_lat = half_lon / 2.0;
        (
            [self.lon - half_lon, self.lat - half_lat],
            [self.lon + half_lon, self.lat + half_lat],
        )
    }
}

/// A plotted company and its hover text.
#[derive(Debug, Clone)]
pub struct Marker {
    pub position: [f64; 2],
    pub tooltip: String,
}

pub fn tooltip(c: &Company) -> String {
    format!(
        "Company: {}\nCountry: {}\nMarket Value: {} B",
        c.company, c.country, c.market_value
    )
}

/// Hover distance, in degrees, within which a marker shows its tooltip.
pub const HOVER_RADIUS: f64 = 3.0;

/// Marker closest to `(lon, lat)`, if one lies within `radius` degrees.
pub fn nearest(markers: &[Marker], lon: f64, lat: f64, radius: f64) -> Option<&Marker> {
    let dist = |m: &Marker| (m.position[0] - lon).powi(2) + (m.position[1] - lat).powi(2);
    markers
        .iter()
        .min_by(|a, b| dist(a).total_cmp(&dist(b)))
        .filter(|m| dist(m) <= radius * radius)
}

/// Scatter of (longitude, latitude), one colour per continent.
pub fn company_map(
    ui: &mut Ui,
    view: &CompanyView<'_>,
    continent: Option<&str>,
    colors: Option<&ColorMap>,
) {
    if view.is_empty() {
        ui.label(super::NO_DATA);
        return;
    }

    let mut by_continent: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    let mut markers = Vec::with_capacity(view.len());
    for c in view.iter() {
        let position = [c.longitude, c.latitude];
        by_continent
            .entry(c.continent.as_str())
            .or_default()
            .push(position);
        markers.push(Marker {
            position,
            tooltip: tooltip(c),
        });
    }

    let viewport = continent_viewport(continent);
    let (min, max) = viewport.corners();

    // A fresh plot id per continent resets pan/zoom to the new viewport.
    Plot::new(("company_map", continent.unwrap_or("world")))
        .legend(Legend::default())
        .height(420.0)
        .data_aspect(1.0)
        .include_x(min[0])
        .include_x(max[0])
        .include_y(min[1])
        .include_y(max[1])
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(move |_name: &str, value: &PlotPoint| {
            nearest(&markers, value.x, value.y, HOVER_RADIUS)
                .map(|m| m.tooltip.clone())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for (name, points) in by_continent {
                let color = colors
                    .map(|cm| cm.color_for(name))
                    .unwrap_or(Color32::RED);
                let name = if name.is_empty() { "Unknown" } else { name };
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .name(name)
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continent_viewports() {
        assert_eq!(
            continent_viewport(Some("Europe")),
            Viewport { lat: 54.0, lon: 15.0, zoom: 3.0 }
        );
        assert_eq!(continent_viewport(None), WORLD_VIEW);
        assert_eq!(continent_viewport(Some("Antarctica")), WORLD_VIEW);
    }

    #[test]
    fn test_world_view_covers_the_globe() {
        let (min, max) = WORLD_VIEW.corners();
        assert_eq!(min, [-180.0, -70.0]);
        assert_eq!(max, [180.0, 110.0]);
        assert!(continent_viewport(Some("Asia")).lon_span() < 360.0);
    }

    #[test]
    fn test_nearest_marker() {
        let markers = vec![
            Marker { position: [-122.0, 37.0], tooltip: "west".into() },
            Marker { position: [116.0, 40.0], tooltip: "east".into() },
        ];
        assert_eq!(nearest(&markers, 115.0, 38.0, HOVER_RADIUS).unwrap().tooltip, "east");
        assert!(nearest(&[], 0.0, 0.0, HOVER_RADIUS).is_none());
    }

    #[test]
    fn test_no_tooltip_far_from_markers() {
        let markers = vec![Marker { position: [-122.0, 37.0], tooltip: "west".into() }];
        // Mid-Pacific: the closest marker is still California.
        assert!(nearest(&markers, -150.0, 0.0, HOVER_RADIUS).is_none());
        assert!(nearest(&markers, -150.0, 0.0, 100.0).is_some());
    }
}
