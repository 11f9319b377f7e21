use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// LaunchSite – the fixed set of pads in the dataset
// ---------------------------------------------------------------------------

/// A launch pad. Ordering follows declaration order so aggregated charts
/// come out in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum LaunchSite {
    #[serde(rename = "CCAFS LC-40")]
    CcafsLc40,
    #[serde(rename = "KSC LC-39A")]
    KscLc39a,
    #[serde(rename = "VAFB SLC-4E")]
    VafbSlc4e,
    #[serde(rename = "CCAFS SLC-40")]
    CcafsSlc40,
}

impl LaunchSite {
    pub const ALL: [LaunchSite; 4] = [
        LaunchSite::CcafsLc40,
        LaunchSite::KscLc39a,
        LaunchSite::VafbSlc4e,
        LaunchSite::CcafsSlc40,
    ];

    /// The label used in the source data and in the UI.
    pub fn label(self) -> &'static str {
        match self {
            LaunchSite::CcafsLc40 => "CCAFS LC-40",
            LaunchSite::KscLc39a => "KSC LC-39A",
            LaunchSite::VafbSlc4e => "VAFB SLC-4E",
            LaunchSite::CcafsSlc40 => "CCAFS SLC-40",
        }
    }
}

impl fmt::Display for LaunchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names none of the known launch sites.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown launch site '{0}'")]
pub struct UnknownSite(pub String);

impl FromStr for LaunchSite {
    type Err = UnknownSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LaunchSite::ALL
            .into_iter()
            .find(|site| site.label() == s)
            .ok_or_else(|| UnknownSite(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Interpret a `class` cell. Pandas exports may write `1.0` instead of `1`.
    pub fn from_class(class: f64) -> Option<Self> {
        if class == 0.0 {
            Some(Outcome::Failure)
        } else if class == 1.0 {
            Some(Outcome::Success)
        } else {
            None
        }
    }

    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Failure => write!(f, "Failure"),
            Outcome::Success => write!(f, "Success"),
        }
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub flight_number: Option<u32>,
    pub site: LaunchSite,
    /// Always finite and non-negative; the loader rejects anything else.
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version: Option<String>,
    /// Used only to group and colour the scatter view.
    pub booster_version_category: String,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after construction; the payload
/// envelope and the category index are computed once here.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    min_payload: f64,
    max_payload: f64,
    sites: BTreeSet<LaunchSite>,
    booster_categories: BTreeSet<String>,
}

impl LaunchDataset {
    /// Build the dataset and its memoized indices in a single pass.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut min_payload = f64::INFINITY;
        let mut max_payload = f64::NEG_INFINITY;
        let mut sites = BTreeSet::new();
        let mut booster_categories = BTreeSet::new();

        for rec in &records {
            min_payload = min_payload.min(rec.payload_mass_kg);
            max_payload = max_payload.max(rec.payload_mass_kg);
            sites.insert(rec.site);
            booster_categories.insert(rec.booster_version_category.clone());
        }

        if records.is_empty() {
            min_payload = 0.0;
            max_payload = 0.0;
        }

        LaunchDataset {
            records,
            min_payload,
            max_payload,
            sites,
            booster_categories,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Smallest payload mass in the table (0 when empty).
    pub fn min_payload(&self) -> f64 {
        self.min_payload
    }

    /// Largest payload mass in the table (0 when empty).
    pub fn max_payload(&self) -> f64 {
        self.max_payload
    }

    /// Distinct sites that actually occur in the data.
    pub fn sites(&self) -> &BTreeSet<LaunchSite> {
        &self.sites
    }

    pub fn booster_categories(&self) -> &BTreeSet<String> {
        &self.booster_categories
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
