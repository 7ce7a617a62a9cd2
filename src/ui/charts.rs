use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Grid, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Polygon};

use crate::color::generate_palette;
use crate::data::aggregate::MarketShare;
use crate::data::compare::Comparison;
use crate::data::model::{CompanyView, Metric};
use crate::error::EmptyTableError;

const SKY_BLUE: Color32 = Color32::from_rgb(135, 206, 235);
const CHART_HEIGHT: f32 = 320.0;

/// Label for a categorical axis: the name at integer positions, blank elsewhere.
pub fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Profit bar chart
// ---------------------------------------------------------------------------

/// One bar per company, in view order.
pub fn profit_bar_chart(ui: &mut Ui, view: &CompanyView<'_>) {
    if view.is_empty() {
        ui.label(super::NO_DATA);
        return;
    }

    let names: Vec<String> = view.iter().map(|c| c.company.clone()).collect();
    let bars: Vec<Bar> = view
        .iter()
        .enumerate()
        .map(|(i, c)| Bar::new(i as f64, c.profits).name(&c.company).width(0.6))
        .collect();
    let chart = BarChart::new(bars).name("Profits ($B)").color(SKY_BLUE);

    Plot::new("profit_bar_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Company")
        .y_axis_label("Profits ($Billion)")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&names, mark.value)
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

// ---------------------------------------------------------------------------
// Market value pie chart
// ---------------------------------------------------------------------------

/// A convex piece of a pie slice. Slices wider than a quarter turn are split
/// so every polygon stays convex.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    /// Index into the shares the wedge was built from.
    pub slice: usize,
    pub label: String,
    pub points: Vec<[f64; 2]>,
}

/// Unit-circle wedges, starting at 12 o'clock and running counter-clockwise.
pub fn pie_wedges(shares: &[MarketShare]) -> Vec<Wedge> {
    const STEP: f64 = TAU / 180.0;

    let mut wedges = Vec::new();
    let mut start = FRAC_PI_2;
    for (slice, share) in shares.iter().enumerate() {
        let sweep = share.fraction * TAU;
        if sweep <= 0.0 {
            continue;
        }
        let label = format!("{} ({:.1}%)", share.company, share.fraction * 100.0);
        let parts = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
        let part_sweep = sweep / parts as f64;

        for p in 0..parts {
            let a0 = start + p as f64 * part_sweep;
            let steps = (part_sweep / STEP).ceil().max(1.0) as usize;
            let mut points = vec![[0.0, 0.0]];
            for s in 0..=steps {
                let a = a0 + part_sweep * s as f64 / steps as f64;
                points.push([a.cos(), a.sin()]);
            }
            wedges.push(Wedge {
                slice,
                label: label.clone(),
                points,
            });
        }
        start += sweep;
    }
    wedges
}

/// Pie of the top market values, or a "no data" note.
pub fn market_share_pie(ui: &mut Ui, shares: Result<&[MarketShare], EmptyTableError>) {
    let shares = match shares {
        Ok(s) => s,
        Err(e) => {
            ui.label(format!("{}: {e}", super::NO_DATA));
            return;
        }
    };
    let palette = generate_palette(shares.len());
    let wedges = pie_wedges(shares);

    Plot::new("market_share_pie")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for wedge in wedges {
                let color = palette.get(wedge.slice).copied().unwrap_or(Color32::GRAY);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(wedge.points))
                        .name(wedge.label)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, color)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Two-company comparison
// ---------------------------------------------------------------------------

/// Grouped bars: one group per metric, one colour per company.
pub fn comparison_chart(ui: &mut Ui, cmp: &Comparison) {
    let labels: Vec<String> = Metric::ALL.iter().map(|m| m.label().to_string()).collect();
    let palette = generate_palette(2);
    let companies = [&cmp.first, &cmp.second];

    Plot::new("comparison_chart")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Metric")
        .y_axis_label("$ Billion")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (k, (metrics, color)) in companies.iter().zip(&palette).enumerate() {
                let offset = if k == 0 { -0.2 } else { 0.2 };
                let bars: Vec<Bar> = Metric::ALL
                    .iter()
                    .enumerate()
                    .filter_map(|(i, m)| {
                        let v = metrics.values.get(m)?;
                        Some(Bar::new(i as f64 + offset, *v).name(m.label()).width(0.4))
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(&metrics.company).color(*color));
            }
        });

    Grid::new("comparison_values").striped(true).show(ui, |ui| {
        ui.strong("Metric");
        for m in companies {
            ui.strong(&m.company);
        }
        ui.end_row();
        for metric in Metric::ALL {
            ui.label(metric.label());
            for m in companies {
                let value = m.values.get(&metric).copied().unwrap_or(f64::NAN);
                ui.label(format!("${value:.2}B"));
            }
            ui.end_row();
        }
    });
}
