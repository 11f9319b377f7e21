use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::chart::{self, ChartExport};
use crate::data::filter::SiteSelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dashboard controls
// ---------------------------------------------------------------------------

/// Render the left control panel: site dropdown and payload range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    // Copy what we need so we can mutate state below.
    let Some(controls) = state.controls.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Launch site dropdown ----
    ui.strong("Launch Site");
    let present = state
        .dataset
        .as_ref()
        .map(|ds| ds.sites().clone())
        .unwrap_or_default();
    let mut selected = controls.site();
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(selected.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in SiteSelection::options() {
                // Sites absent from the data stay selectable; their charts are empty.
                let text = match option {
                    SiteSelection::Site(site) if !present.contains(&site) => {
                        RichText::new(format!("{}  (no launches)", option.label())).weak()
                    }
                    _ => RichText::new(option.label()),
                };
                ui.selectable_value(&mut selected, option, text);
            }
        });
    if selected != controls.site() {
        state.select_site(selected);
    }
    ui.separator();

    // ---- Payload range: two handles sharing one envelope ----
    ui.strong("Payload Range (kg)");
    let envelope = controls.envelope();
    let range = controls.payload_range();
    let bounds = envelope.min()..=envelope.max();
    let step = controls.step();

    let mut lo = range.min();
    if ui
        .add(
            Slider::new(&mut lo, bounds.clone())
                .text("min")
                .step_by(step)
                .fixed_decimals(0),
        )
        .changed()
    {
        state.set_payload_min(lo);
    }

    let mut hi = range.max();
    if ui
        .add(
            Slider::new(&mut hi, bounds)
                .text("max")
                .step_by(step)
                .fixed_decimals(0),
        )
        .changed()
    {
        state.set_payload_max(hi);
    }

    // egui sliders have no tick marks; label the ends of the track instead.
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{:.0}", envelope.min())).small().weak());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            ui.label(RichText::new(format!("{:.0}", envelope.max())).small().weak());
            ui.label(RichText::new(format!("step {step:.0} kg")).small().weak());
        });
    });

    if ui.button("Reset").clicked() {
        state.reset_controls();
    }
    ui.separator();

    // ---- Booster category legend ----
    ui.strong("Booster Version Category");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(cm) = &state.booster_colors {
                for (category, color) in cm.legend_entries() {
                    ui.label(RichText::new(format!("● {category}")).color(color));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.pie.is_some() && state.scatter.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export charts…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let visible = state.scatter.as_ref().map_or(0, |s| s.points.len());
            ui.label(format!("{} launches loaded, {} in range", ds.len(), visible));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_records, "Records")
            .clicked()
        {
            state.show_records = !state.show_records;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open launch records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                // The previous dataset stays on screen.
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let (Some(controls), Some(pie), Some(scatter)) = (&state.controls, &state.pie, &state.scatter)
    else {
        return;
    };

    let Some(path) = rfd::FileDialog::new()
        .set_title("Export chart specifications")
        .set_file_name("launch_charts.json")
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return;
    };

    let charts = ChartExport {
        controls,
        pie,
        scatter,
    };
    if let Err(e) = chart::export(&path, &charts) {
        log::error!("Failed to export charts: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
