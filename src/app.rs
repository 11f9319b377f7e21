use eframe::egui;

use crate::data::model::LaunchDataset;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LaunchDashApp {
    pub state: AppState,
}

impl LaunchDashApp {
    /// Start on an already loaded dataset, optionally with a site preselected.
    pub fn new(dataset: LaunchDataset, payload_step: f64, initial_site: Option<&str>) -> Self {
        let mut state = AppState::new(payload_step);
        state.set_dataset(dataset);
        if let Some(site) = initial_site {
            state.select_site_value(site);
        }
        Self { state }
    }
}

impl eframe::App for LaunchDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: records behind the scatter chart ----
        if self.state.show_records {
            egui::TopBottomPanel::bottom("records_panel")
                .resizable(true)
                .default_height(220.0)
                .show(ctx, |ui| {
                    table::records_table(ui, &self.state);
                });
        }

        // ---- Central panel: pie above scatter ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("SpaceX Launch Records Dashboard");
            });
            ui.separator();

            let state = &self.state;
            match (&state.dataset, &state.pie, &state.scatter) {
                (Some(ds), _, _) if ds.is_empty() => {
                    ui.centered_and_justified(|ui| {
                        ui.heading("The data file has no launches  (File → Open…)");
                    });
                }
                (Some(_), Some(pie), Some(scatter)) => {
                    let pie_height = ui.available_height() * 0.42;
                    plot::pie_chart(ui, state, pie, pie_height);
                    ui.separator();
                    plot::scatter_chart(ui, state, scatter);
                }
                _ => {
                    ui.centered_and_justified(|ui| {
                        ui.heading("Open a file to view launches  (File → Open…)");
                    });
                }
            }
        });
    }
}
