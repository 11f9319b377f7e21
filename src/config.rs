use std::path::PathBuf;

use clap::Parser;

/// Data file used when neither an argument nor the environment names one.
pub const DEFAULT_DATA_FILE: &str = "spacex_launch_dash.csv";

/// Startup configuration for the dashboard.
///
/// Data path precedence: positional argument, then `LAUNCH_DASH_DATA`, then
/// the default file in the working directory.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "launch-dash")]
#[command(about = "SpaceX launch records dashboard", long_about = None)]
#[command(version)]
pub struct DashConfig {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(env = "LAUNCH_DASH_DATA", default_value = DEFAULT_DATA_FILE)]
    pub data_path: PathBuf,

    /// Site to select at startup ("ALL" or a site label); validated by the controls
    #[arg(long = "site", env = "LAUNCH_DASH_SITE")]
    pub initial_site: Option<String>,

    /// Payload slider step in kg
    #[arg(long, default_value_t = 1000.0, value_parser = parse_step)]
    pub payload_step: f64,

    #[arg(skip = [1200.0_f32, 900.0])]
    pub window_size: [f32; 2],

    #[arg(skip = [700.0_f32, 500.0])]
    pub min_window_size: [f32; 2],
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(format!("step must be a positive number, got {s}"))
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn defaults_to_the_dash_csv() {
        let cfg = DashConfig::try_parse_from(["launch-dash"]).expect("parse");
        assert_eq!(cfg.data_path, PathBuf::from("spacex_launch_dash.csv"));
        assert_eq!(cfg.payload_step, 1000.0);
        assert_eq!(cfg.window_size, [1200.0, 900.0]);
    }

    #[test]
    fn positional_path_and_flags() {
        let cfg = DashConfig::try_parse_from([
            "launch-dash",
            "launches.parquet",
            "--site",
            "VAFB SLC-4E",
            "--payload-step",
            "500",
        ])
        .expect("parse");
        assert_eq!(cfg.data_path, PathBuf::from("launches.parquet"));
        assert_eq!(cfg.initial_site.as_deref(), Some("VAFB SLC-4E"));
        assert_eq!(cfg.payload_step, 500.0);
    }

    #[test]
    fn help_and_unknown_flags_are_not_data_paths() {
        let err = DashConfig::try_parse_from(["launch-dash", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = DashConfig::try_parse_from(["launch-dash", "--dat", "x.csv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn non_positive_step_is_rejected() {
        assert!(DashConfig::try_parse_from(["launch-dash", "--payload-step", "0"]).is_err());
        assert!(DashConfig::try_parse_from(["launch-dash", "--payload-step", "-5"]).is_err());
    }
}
