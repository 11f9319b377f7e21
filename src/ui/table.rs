use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::outcome_color;
use crate::state::AppState;

const HEADERS: [&str; 6] = [
    "Flight",
    "Launch Site",
    "Payload Mass (kg)",
    "Outcome",
    "Booster Version",
    "Category",
];

/// Table of the launches currently shown in the scatter chart.
pub fn records_table(ui: &mut Ui, state: &AppState) {
    let records = state.filtered_records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(50.0))
        .columns(Column::auto().at_least(90.0), 4)
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let rec = records[row.index()];
                row.col(|ui| {
                    ui.label(rec.flight_number.map(|n| n.to_string()).unwrap_or_default());
                });
                row.col(|ui| {
                    ui.label(rec.site.label());
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", rec.payload_mass_kg));
                });
                row.col(|ui| {
                    ui.label(RichText::new(rec.outcome.to_string()).color(outcome_color(rec.outcome)));
                });
                row.col(|ui| {
                    ui.label(rec.booster_version.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(&rec.booster_version_category);
                });
            });
        });
}
