use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::filter::{filtered_indices, ControlState, PayloadRange, SiteSelection};
use crate::data::model::{LaunchDataset, LaunchSite, Outcome};

// ---------------------------------------------------------------------------
// Chart specifications
// ---------------------------------------------------------------------------

/// What a pie slice counts: a site's successes, or one outcome at a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceKey {
    Site(LaunchSite),
    Outcome(Outcome),
}

/// One wedge of a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    #[serde(skip)]
    pub key: SliceKey,
    pub label: String,
    pub value: f64,
}

/// Renderer-independent description of the success pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Text to show instead of wedges, if there is nothing to draw.
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.slices.is_empty() {
            Some("No launches to show")
        } else if self.total() <= 0.0 {
            Some("No successful launches")
        } else {
            None
        }
    }

    /// Fraction of the whole taken by slice `index` (0 when the pie is empty).
    pub fn share(&self, index: usize) -> f64 {
        let total = self.total();
        match self.slices.get(index) {
            Some(slice) if total > 0.0 => slice.value / total,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    /// Outcome class: 1 = success, 0 = failure.
    pub outcome: f64,
    pub booster_version_category: String,
    pub site: LaunchSite,
}

/// Renderer-independent description of the payload/outcome scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterChart {
    /// Distinct booster categories among the points, sorted.
    pub fn groups(&self) -> BTreeSet<&str> {
        self.points
            .iter()
            .map(|p| p.booster_version_category.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Pie chart for the site dropdown.
///
/// * `All`: one slice per site present in the data, sized by its number of
///   successful launches.
/// * One site: a slice per outcome that occurs there (failure, then success).
///   A site with no launches yields an empty pie.
pub fn compute_pie_chart_data(dataset: &LaunchDataset, site: SiteSelection) -> PieChart {
    match site {
        SiteSelection::All => {
            let mut successes: BTreeMap<LaunchSite, f64> = BTreeMap::new();
            for rec in dataset.records() {
                *successes.entry(rec.site).or_default() += f64::from(rec.outcome.class());
            }
            PieChart {
                title: format!("Total Successful Launches for {}", site.label()),
                slices: successes
                    .into_iter()
                    .map(|(site, value)| PieSlice {
                        key: SliceKey::Site(site),
                        label: site.to_string(),
                        value,
                    })
                    .collect(),
            }
        }
        SiteSelection::Site(selected) => {
            let mut counts: BTreeMap<Outcome, f64> = BTreeMap::new();
            for rec in dataset.records().iter().filter(|r| r.site == selected) {
                *counts.entry(rec.outcome).or_default() += 1.0;
            }
            PieChart {
                title: format!("Launch Outcomes for {selected}"),
                slices: counts
                    .into_iter()
                    .map(|(outcome, value)| PieSlice {
                        key: SliceKey::Outcome(outcome),
                        label: outcome.to_string(),
                        value,
                    })
                    .collect(),
            }
        }
    }
}

/// Scatter chart of payload mass against outcome for launches inside `range`
/// at the selected site.
pub fn compute_scatter_data(
    dataset: &LaunchDataset,
    site: SiteSelection,
    range: &PayloadRange,
) -> ScatterChart {
    let records = dataset.records();
    let points = filtered_indices(dataset, site, range)
        .into_iter()
        .map(|i| {
            let rec = &records[i];
            ScatterPoint {
                payload_mass_kg: rec.payload_mass_kg,
                outcome: f64::from(rec.outcome.class()),
                booster_version_category: rec.booster_version_category.clone(),
                site: rec.site,
            }
        })
        .collect();

    ScatterChart {
        title: format!("Payload vs. Launch Outcome for {}", site.label()),
        x_label: "Payload Mass (kg)".to_string(),
        y_label: "Launch Outcome (1 = Success, 0 = Failure)".to_string(),
        points,
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Both charts plus the controls that produced them, for external renderers.
#[derive(Debug, Serialize)]
pub struct ChartExport<'a> {
    pub controls: &'a ControlState,
    pub pie: &'a PieChart,
    pub scatter: &'a ScatterChart,
}

/// Write the chart specifications as pretty-printed JSON.
pub fn export(path: &Path, charts: &ChartExport<'_>) -> Result<()> {
    let json = serde_json::to_string_pretty(charts).context("serializing charts")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("exported charts to {}", path.display());
    Ok(())
}
