use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Outcome;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed green / red for launch outcomes.
pub fn outcome_color(outcome: Outcome) -> Color32 {
    match outcome {
        Outcome::Success => Color32::from_rgb(80, 180, 100),
        Outcome::Failure => Color32::from_rgb(210, 80, 70),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a category (booster version, launch site)
/// to distinct colours. Built once per dataset so colours stay stable while
/// the controls change.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, Color32>,
    default_color: Color32,
}

impl<K: Ord + Clone> ColorMap<K> {
    /// Build a colour map from the category's values, in iteration order.
    pub fn new<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let values: Vec<&K> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<K, Color32> = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a value; unknown values are grey.
    pub fn color_for<Q>(&self, value: &Q) -> Color32
    where
        K: std::borrow::Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (value → colour) in sorted order.
    pub fn legend_entries(&self) -> impl Iterator<Item = (&K, Color32)> {
        self.mapping.iter().map(|(v, c)| (v, *c))
    }
}
