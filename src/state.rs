use crate::chart::{compute_pie_chart_data, compute_scatter_data, PieChart, ScatterChart};
use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, ControlState, SiteSelection};
use crate::data::model::{LaunchDataset, LaunchRecord, LaunchSite};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The pie chart depends only on the selected site; the scatter chart
/// depends on the site and the payload range. Each setter recomputes exactly
/// the charts that depend on what it changed.
pub struct AppState {
    /// Loaded dataset (None until a file loads).
    pub dataset: Option<LaunchDataset>,

    /// Dropdown + slider values (None without a dataset).
    pub controls: Option<ControlState>,

    pub pie: Option<PieChart>,
    pub scatter: Option<ScatterChart>,

    /// Colours for the scatter groups.
    pub booster_colors: Option<ColorMap<String>>,

    /// Colours for the all-sites pie.
    pub site_colors: ColorMap<LaunchSite>,

    /// Payload slider step in kg.
    pub payload_step: f64,

    /// Show the records table under the charts.
    pub show_records: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(payload_step: f64) -> Self {
        Self {
            dataset: None,
            controls: None,
            pie: None,
            scatter: None,
            booster_colors: None,
            site_colors: ColorMap::new(&LaunchSite::ALL),
            payload_step,
            show_records: false,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset the controls and draw both charts.
    pub fn set_dataset(&mut self, dataset: LaunchDataset) {
        self.controls = Some(ControlState::new(&dataset, self.payload_step));
        self.booster_colors = Some(ColorMap::new(dataset.booster_categories()));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.recompute_pie();
        self.recompute_scatter();
    }

    /// Dropdown changed: both charts depend on the site.
    pub fn select_site(&mut self, site: SiteSelection) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        if controls.site() == site {
            return;
        }
        controls.set_site(site);
        self.recompute_pie();
        self.recompute_scatter();
    }

    /// Apply a raw dropdown value (`"ALL"` or a site label). Unknown values
    /// are rejected here and never reach the chart selectors.
    pub fn select_site_value(&mut self, value: &str) {
        match SiteSelection::parse(value) {
            Ok(site) => self.select_site(site),
            Err(e) => {
                log::warn!("rejected site selection: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Lower slider handle moved.
    pub fn set_payload_min(&mut self, value: f64) {
        if let Some(controls) = self.controls.as_mut() {
            controls.set_payload_min(value);
            self.recompute_scatter();
        }
    }

    /// Upper slider handle moved.
    pub fn set_payload_max(&mut self, value: f64) {
        if let Some(controls) = self.controls.as_mut() {
            controls.set_payload_max(value);
            self.recompute_scatter();
        }
    }

    /// Set both payload bounds; invalid input is rejected and reported.
    pub fn set_payload_range(&mut self, min: f64, max: f64) {
        let Some(controls) = self.controls.as_mut() else {
            return;
        };
        match controls.set_payload_range(min, max) {
            Ok(()) => self.recompute_scatter(),
            Err(e) => {
                log::warn!("rejected payload range: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Back to all sites and the full payload envelope.
    pub fn reset_controls(&mut self) {
        if let Some(controls) = self.controls.as_mut() {
            controls.reset();
            self.recompute_pie();
            self.recompute_scatter();
        }
    }

    /// Records behind the current scatter chart, in dataset order.
    pub fn filtered_records(&self) -> Vec<&LaunchRecord> {
        match (&self.dataset, &self.controls) {
            (Some(ds), Some(controls)) => {
                filtered_indices(ds, controls.site(), &controls.payload_range())
                    .into_iter()
                    .map(|i| &ds.records()[i])
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn recompute_pie(&mut self) {
        if let (Some(ds), Some(controls)) = (&self.dataset, &self.controls) {
            log::debug!("recomputing pie chart for {}", controls.site());
            self.pie = Some(compute_pie_chart_data(ds, controls.site()));
        }
    }

    fn recompute_scatter(&mut self) {
        if let (Some(ds), Some(controls)) = (&self.dataset, &self.controls) {
            let range = controls.payload_range();
            log::debug!(
                "recomputing scatter chart for {} in {}..={} kg",
                controls.site(),
                range.min(),
                range.max()
            );
            self.scatter = Some(compute_scatter_data(ds, controls.site(), &range));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::four_launches;

    fn loaded() -> AppState {
        let mut state = AppState::new(1000.0);
        state.set_dataset(four_launches());
        state
    }

    #[test]
    fn loading_draws_both_charts_for_all_sites() {
        let state = loaded();
        assert_eq!(state.pie.as_ref().map(|p| p.slices.len()), Some(3));
        assert_eq!(state.scatter.as_ref().map(|s| s.points.len()), Some(4));
        assert_eq!(state.filtered_records().len(), 4);
    }

    #[test]
    fn payload_change_leaves_pie_untouched() {
        let mut state = loaded();
        let pie_before = state.pie.clone();

        state.set_payload_min(1000.0);
        assert_eq!(state.pie, pie_before);
        assert_eq!(state.scatter.as_ref().map(|s| s.points.len()), Some(3));

        state.set_payload_max(3000.0);
        assert_eq!(state.scatter.as_ref().map(|s| s.points.len()), Some(1));
        assert_eq!(state.pie, pie_before);
    }

    #[test]
    fn site_change_recomputes_both_charts() {
        let mut state = loaded();
        state.select_site(SiteSelection::Site(LaunchSite::CcafsLc40));

        let pie = state.pie.as_ref().expect("pie");
        assert!(pie.title.contains("CCAFS LC-40"));
        assert_eq!(pie.total(), 2.0);
        assert_eq!(state.scatter.as_ref().map(|s| s.points.len()), Some(2));
        assert_eq!(state.filtered_records().len(), 2);
    }

    #[test]
    fn unknown_site_value_is_rejected_at_the_boundary() {
        let mut state = loaded();
        state.select_site_value("KSC LC-39A");
        state.select_site_value("Cape Canaveral");

        assert!(state.status_message.as_deref().is_some_and(|m| m.contains("Cape Canaveral")));
        assert_eq!(
            state.controls.as_ref().map(|c| c.site()),
            Some(SiteSelection::Site(LaunchSite::KscLc39a))
        );
        assert_eq!(state.pie.as_ref().map(|p| p.total()), Some(1.0));
    }

    #[test]
    fn inverted_range_is_reported_not_applied() {
        let mut state = loaded();
        state.set_payload_range(8000.0, 2000.0);

        assert!(state.status_message.is_some());
        assert_eq!(state.scatter.as_ref().map(|s| s.points.len()), Some(4));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = loaded();
        state.select_site(SiteSelection::Site(LaunchSite::VafbSlc4e));
        state.set_payload_max(2000.0);
        state.reset_controls();

        assert_eq!(state.controls.as_ref().map(|c| c.site()), Some(SiteSelection::All));
        assert_eq!(state.scatter.as_ref().map(|s| s.points.len()), Some(4));
    }

    #[test]
    fn controls_are_inert_without_a_dataset() {
        let mut state = AppState::new(1000.0);
        state.select_site(SiteSelection::All);
        state.set_payload_min(10.0);
        assert!(state.pie.is_none());
        assert!(state.scatter.is_none());
        assert!(state.filtered_records().is_empty());
    }
}
