use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::chart::{PieChart, ScatterChart, SliceKey};
use crate::color::outcome_color;
use crate::state::AppState;

/// Segments used for a full circle; wedges get a proportional share.
const CIRCLE_SEGMENTS: usize = 96;

// ---------------------------------------------------------------------------
// Pie chart (upper central panel)
// ---------------------------------------------------------------------------

/// Outline of a unit-circle wedge from `start` to `end`, both fractions of
/// a full turn measured clockwise from twelve o'clock.
pub fn wedge_points(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start) * CIRCLE_SEGMENTS as f64).ceil() as usize).max(1);
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let frac = start + (end - start) * i as f64 / steps as f64;
        let angle = FRAC_PI_2 - frac * TAU;
        points.push([angle.cos(), angle.sin()]);
    }
    points
}

fn slice_color(state: &AppState, key: SliceKey) -> Color32 {
    match key {
        SliceKey::Site(site) => state.site_colors.color_for(&site),
        SliceKey::Outcome(outcome) => outcome_color(outcome),
    }
}

/// Render the success pie chart.
pub fn pie_chart(ui: &mut Ui, state: &AppState, pie: &PieChart, height: f32) {
    ui.strong(&pie.title);

    if let Some(text) = pie.placeholder() {
        ui.add_sized(
            [ui.available_width(), height],
            eframe::egui::Label::new(RichText::new(text).weak()),
        );
        return;
    }

    Plot::new("success_pie_chart")
        .height(height)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for (i, slice) in pie.slices.iter().enumerate() {
                let share = pie.share(i);
                let end = start + share;
                let name = format!("{} ({:.1}%)", slice.label, share * 100.0);

                if share > 0.0 {
                    let polygon = Polygon::new(PlotPoints::new(wedge_points(start, end)))
                        .name(&name)
                        .fill_color(slice_color(state, slice.key))
                        .stroke(Stroke::new(1.0, Color32::WHITE));
                    plot_ui.polygon(polygon);

                    let mid = FRAC_PI_2 - (start + end) / 2.0 * TAU;
                    plot_ui.text(Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{}", slice.value)).strong(),
                    ));
                }
                start = end;
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter chart (lower central panel)
// ---------------------------------------------------------------------------

/// Render payload mass against outcome, one series per booster category.
pub fn scatter_chart(ui: &mut Ui, state: &AppState, scatter: &ScatterChart) {
    ui.strong(&scatter.title);

    Plot::new("success_payload_scatter_chart")
        .legend(Legend::default())
        .x_axis_label(&scatter.x_label)
        .y_axis_label(&scatter.y_label)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for group in scatter.groups() {
                let color = state
                    .booster_colors
                    .as_ref()
                    .map(|cm| cm.color_for(group))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: PlotPoints = scatter
                    .points
                    .iter()
                    .filter(|p| p.booster_version_category == group)
                    .map(|p| [p.payload_mass_kg, p.outcome])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(group)
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}
