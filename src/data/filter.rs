use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, LaunchSite};

// ---------------------------------------------------------------------------
// Control-boundary errors
// ---------------------------------------------------------------------------

/// Rejected control input. Filtering code only ever sees validated values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error("unknown launch site '{0}'")]
    UnknownSite(String),
    #[error("payload range is inverted: {min} > {max}")]
    InvertedRange { min: f64, max: f64 },
    #[error("payload bounds must be finite numbers")]
    NonFinite,
}

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// The site dropdown: every site, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(LaunchSite),
}

impl SiteSelection {
    /// The sentinel value for "every site".
    pub const ALL_VALUE: &'static str = "ALL";

    /// Dropdown entries in display order.
    pub fn options() -> impl Iterator<Item = SiteSelection> {
        std::iter::once(SiteSelection::All).chain(LaunchSite::ALL.into_iter().map(SiteSelection::Site))
    }

    /// Parse a control value: `"ALL"` or an exact site label.
    pub fn parse(value: &str) -> Result<Self, ControlError> {
        let value = value.trim();
        if value == Self::ALL_VALUE {
            return Ok(SiteSelection::All);
        }
        value
            .parse::<LaunchSite>()
            .map(SiteSelection::Site)
            .map_err(|_| ControlError::UnknownSite(value.to_string()))
    }

    /// The raw control value (`"ALL"` or the site label).
    pub fn value(&self) -> &'static str {
        match self {
            SiteSelection::All => Self::ALL_VALUE,
            SiteSelection::Site(site) => site.label(),
        }
    }

    /// Human label: "All Sites" or the site name.
    pub fn label(&self) -> &'static str {
        match self {
            SiteSelection::All => "All Sites",
            SiteSelection::Site(site) => site.label(),
        }
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.site == *site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for SiteSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// A closed payload interval in kg. `min <= max` holds for every value
/// of this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    min: f64,
    max: f64,
}

impl PayloadRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ControlError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ControlError::NonFinite);
        }
        if min > max {
            return Err(ControlError::InvertedRange { min, max });
        }
        Ok(PayloadRange { min, max })
    }

    /// The dataset's observed payload envelope.
    pub fn envelope(dataset: &LaunchDataset) -> Self {
        PayloadRange {
            min: dataset.min_payload(),
            max: dataset.max_payload(),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Inclusive on both ends.
    pub fn contains(&self, payload_kg: f64) -> bool {
        self.min <= payload_kg && payload_kg <= self.max
    }

    /// Narrow this range so it lies inside `envelope`.
    pub fn clamp_to(&self, envelope: &PayloadRange) -> PayloadRange {
        let min = self.min.clamp(envelope.min, envelope.max);
        let max = self.max.clamp(envelope.min, envelope.max);
        PayloadRange { min, max: max.max(min) }
    }
}

// ---------------------------------------------------------------------------
// Control state
// ---------------------------------------------------------------------------

/// Current values of the two dashboard controls, bounded by the dataset's
/// payload envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlState {
    site: SiteSelection,
    payload_range: PayloadRange,
    #[serde(skip)]
    envelope: PayloadRange,
    #[serde(skip)]
    step: f64,
}

impl ControlState {
    /// Defaults: every site, the full payload envelope.
    pub fn new(dataset: &LaunchDataset, step: f64) -> Self {
        let envelope = PayloadRange::envelope(dataset);
        ControlState {
            site: SiteSelection::All,
            payload_range: envelope,
            envelope,
            step,
        }
    }

    pub fn site(&self) -> SiteSelection {
        self.site
    }

    pub fn payload_range(&self) -> PayloadRange {
        self.payload_range
    }

    pub fn envelope(&self) -> PayloadRange {
        self.envelope
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn set_site(&mut self, site: SiteSelection) {
        self.site = site;
    }

    /// Move the lower handle; it never passes the upper one.
    pub fn set_payload_min(&mut self, value: f64) {
        let min = self.snap(value).min(self.payload_range.max);
        self.payload_range.min = min;
    }

    /// Move the upper handle; it never passes the lower one.
    pub fn set_payload_max(&mut self, value: f64) {
        let max = self.snap(value).max(self.payload_range.min);
        self.payload_range.max = max;
    }

    /// Replace both bounds at once. Inverted or non-finite input is rejected,
    /// anything else is clamped into the envelope.
    pub fn set_payload_range(&mut self, min: f64, max: f64) -> Result<(), ControlError> {
        let range = PayloadRange::new(min, max)?;
        self.payload_range = range.clamp_to(&self.envelope);
        Ok(())
    }

    /// Back to all sites and the full envelope.
    pub fn reset(&mut self) {
        self.site = SiteSelection::All;
        self.payload_range = self.envelope;
    }

    /// Round to the slider step counted from the envelope minimum (the grid
    /// egui's `Slider::step_by` uses), keeping both envelope ends reachable.
    fn snap(&self, value: f64) -> f64 {
        let PayloadRange { min, max } = self.envelope;
        if !value.is_finite() || value <= min {
            return min;
        }
        if value >= max {
            return max;
        }
        if self.step <= 0.0 {
            return value;
        }
        (min + ((value - min) / self.step).round() * self.step).clamp(min, max)
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Return indices of launches at the selected site whose payload lies in
/// `range`. The two predicates commute; both are always applied.
pub fn filtered_indices(
    dataset: &LaunchDataset,
    site: SiteSelection,
    range: &PayloadRange,
) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.payload_mass_kg) && site.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
