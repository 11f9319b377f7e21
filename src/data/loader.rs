use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, LaunchSite, Outcome};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong turning a file into a [`LaunchDataset`].
/// Any error aborts the whole load; there are no partial datasets.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reading Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("decoding Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// A column of the canonical schema plus the snake_case alias some exports use.
#[derive(Debug, Clone, Copy)]
struct Column {
    canonical: &'static str,
    alias: &'static str,
}

impl Column {
    fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header == self.canonical || header == self.alias
    }

    fn position<'a>(&self, mut headers: impl Iterator<Item = &'a str>) -> Option<usize> {
        headers.position(|h| self.matches(h))
    }
}

const SITE: Column = Column { canonical: "Launch Site", alias: "site" };
const PAYLOAD: Column = Column { canonical: "Payload Mass (kg)", alias: "payload_mass_kg" };
const CLASS: Column = Column { canonical: "class", alias: "class" };
const CATEGORY: Column = Column {
    canonical: "Booster Version Category",
    alias: "booster_version_category",
};
const FLIGHT_NUMBER: Column = Column { canonical: "Flight Number", alias: "flight_number" };
const BOOSTER_VERSION: Column = Column { canonical: "Booster Version", alias: "booster_version" };

const REQUIRED: [Column; 4] = [SITE, PAYLOAD, CLASS, CATEGORY];

/// Fail with the first required column the header set lacks.
fn check_required<'a, I>(headers: I) -> Result<(), DataLoadError>
where
    I: Iterator<Item = &'a str> + Clone,
{
    for col in REQUIRED {
        if col.position(headers.clone()).is_none() {
            return Err(DataLoadError::MissingColumn(col.canonical));
        }
    }
    Ok(())
}

/// One row as it appears on disk, before validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Flight Number", alias = "flight_number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Launch Site", alias = "site")]
    site: String,
    #[serde(rename = "Payload Mass (kg)", alias = "payload_mass_kg")]
    payload_mass_kg: f64,
    class: f64,
    #[serde(rename = "Booster Version", alias = "booster_version", default)]
    booster_version: Option<String>,
    #[serde(rename = "Booster Version Category", alias = "booster_version_category")]
    booster_version_category: String,
}

impl RawRecord {
    /// Validate one row. `row` is the 1-based data row, used in messages.
    fn into_record(self, row: usize) -> Result<LaunchRecord, DataLoadError> {
        let invalid = |message: String| DataLoadError::InvalidRow { row, message };

        let site: LaunchSite = self.site.parse().map_err(|e| invalid(format!("{e}")))?;

        if !self.payload_mass_kg.is_finite() || self.payload_mass_kg < 0.0 {
            return Err(invalid(format!(
                "payload mass {} is not a non-negative number",
                self.payload_mass_kg
            )));
        }

        let outcome = Outcome::from_class(self.class)
            .ok_or_else(|| invalid(format!("class {} is neither 0 nor 1", self.class)))?;

        let category = self.booster_version_category.trim();
        if category.is_empty() {
            return Err(invalid("empty booster version category".to_string()));
        }

        Ok(LaunchRecord {
            flight_number: self.flight_number,
            site,
            payload_mass_kg: self.payload_mass_kg,
            outcome,
            booster_version: self
                .booster_version
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            booster_version_category: category.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row using the canonical column names (recommended)
/// * `.json`    – `[{ "Launch Site": "...", "Payload Mass (kg)": 500.0, ... }, ...]`
/// * `.parquet` – one column per field, numeric or string typed
///
/// Columns may also use the snake_case names (`site`, `payload_mass_kg`,
/// `booster_version_category`). Extra columns are ignored.
pub fn load_file(path: &Path) -> Result<LaunchDataset, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = LaunchDataset::from_records(records);
    log::info!(
        "loaded {} launches from {} (payload {}..={} kg)",
        dataset.len(),
        path.display(),
        dataset.min_payload(),
        dataset.max_payload()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<LaunchRecord>, DataLoadError> {
    read_csv(open(path)?)
}

fn read_csv<R: std::io::Read>(input: R) -> Result<Vec<LaunchRecord>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    check_required(headers.iter().map(String::as_str))?;

    reader
        .deserialize::<RawRecord>()
        .enumerate()
        .map(|(i, result)| result?.into_record(i + 1))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<LaunchRecord>, DataLoadError> {
    let root: JsonValue = serde_json::from_reader(BufReader::new(open(path)?))?;

    let rows = match root {
        JsonValue::Array(rows) => rows,
        _ => {
            return Err(DataLoadError::InvalidRow {
                row: 0,
                message: "expected a top-level JSON array of records".to_string(),
            })
        }
    };

    rows.into_iter()
        .enumerate()
        .map(|(i, value)| {
            let row = i + 1;
            let obj = value.as_object().ok_or_else(|| DataLoadError::InvalidRow {
                row,
                message: "not a JSON object".to_string(),
            })?;
            check_required(obj.keys().map(String::as_str))?;
            RawRecord::deserialize(value)?.into_record(row)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load launch records from Parquet. Works with files written by Pandas
/// (`df.to_parquet()`) and Polars as long as the columns are scalar.
fn load_parquet(path: &Path) -> Result<Vec<LaunchRecord>, DataLoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let offset = records.len();
        records.extend(records_from_batch(&batch, offset)?);
    }
    Ok(records)
}

/// Convert one record batch; `offset` is the number of rows already read.
fn records_from_batch(
    batch: &RecordBatch,
    offset: usize,
) -> Result<Vec<LaunchRecord>, DataLoadError> {
    let schema = batch.schema();
    let names = || schema.fields().iter().map(|f| f.name().as_str());
    check_required(names())?;

    let column = |col: Column| col.position(names()).map(|i| batch.column(i).clone());
    let required = |col: Column| column(col).ok_or(DataLoadError::MissingColumn(col.canonical));

    let site = cast(&required(SITE)?, &DataType::Utf8)?;
    let payload = cast(&required(PAYLOAD)?, &DataType::Float64)?;
    let class = cast(&required(CLASS)?, &DataType::Float64)?;
    let category = cast(&required(CATEGORY)?, &DataType::Utf8)?;
    let flight = column(FLIGHT_NUMBER)
        .map(|c| cast(&c, &DataType::Float64))
        .transpose()?;
    let booster = column(BOOSTER_VERSION)
        .map(|c| cast(&c, &DataType::Utf8))
        .transpose()?;

    (0..batch.num_rows())
        .map(|i| {
            let row = offset + i + 1;
            let raw = RawRecord {
                flight_number: flight
                    .as_ref()
                    .and_then(|c| float_at(c, i))
                    .map(|v| flight_number_from(v, row))
                    .transpose()?,
                site: string_at(&site, i).ok_or_else(|| null_cell(row, SITE))?,
                payload_mass_kg: float_at(&payload, i).ok_or_else(|| null_cell(row, PAYLOAD))?,
                class: float_at(&class, i).ok_or_else(|| null_cell(row, CLASS))?,
                booster_version: booster.as_ref().and_then(|c| string_at(c, i)),
                booster_version_category: string_at(&category, i)
                    .ok_or_else(|| null_cell(row, CATEGORY))?,
            };
            raw.into_record(row)
        })
        .collect()
}

// -- Arrow helpers (columns are already cast to Utf8 / Float64) --

fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_string::<i32>().value(row).to_string())
}

fn float_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    Some(col.as_primitive::<Float64Type>().value(row))
}

/// Flight numbers arrive as floats after the cast; only whole values in
/// `u32` range are accepted.
fn flight_number_from(value: f64, row: usize) -> Result<u32, DataLoadError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(DataLoadError::InvalidRow {
            row,
            message: format!("flight number {value} is not a whole non-negative number"),
        })
    }
}

fn null_cell(row: usize, col: Column) -> DataLoadError {
    DataLoadError::InvalidRow {
        row,
        message: format!("null value in '{}'", col.canonical),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::{tempdir, NamedTempFile};

    use super::*;

    const CANONICAL_CSV: &str = "\
,Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category
0,1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0
1,2,CCAFS LC-40,0,525.0,F9 v1.0  B0004,v1.0
2,24,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT
3,27,VAFB SLC-4E,1,9600.0,F9 FT B1029.1,FT
";

    fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn loads_canonical_csv() {
        let file = write_temp(".csv", CANONICAL_CSV);
        let ds = load_file(file.path()).expect("load");

        assert_eq!(ds.len(), 4);
        assert_eq!(ds.min_payload(), 0.0);
        assert_eq!(ds.max_payload(), 9600.0);

        let first = &ds.records()[0];
        assert_eq!(first.flight_number, Some(1));
        assert_eq!(first.site, LaunchSite::CcafsLc40);
        assert_eq!(first.outcome, Outcome::Failure);
        assert_eq!(first.booster_version.as_deref(), Some("F9 v1.0  B0003"));
        assert_eq!(ds.records()[3].booster_version_category, "FT");
    }

    #[test]
    fn loads_snake_case_csv_without_optional_columns() {
        let file = write_temp(
            ".csv",
            "site,payload_mass_kg,class,booster_version_category\n\
             KSC LC-39A,3000,1.0,FT\n\
             CCAFS SLC-40,4500.5,0.0,B5\n",
        );
        let ds = load_file(file.path()).expect("load");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].site, LaunchSite::CcafsSlc40);
        assert_eq!(ds.records()[1].flight_number, None);
        assert_eq!(ds.records()[0].outcome, Outcome::Success);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let err = load_file(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::NotFound(_)));
    }

    #[test]
    fn missing_column_is_reported_by_canonical_name() {
        let file = write_temp(".csv", "Launch Site,class,Booster Version Category\nKSC LC-39A,1,FT\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn("Payload Mass (kg)")));
    }

    #[test]
    fn unknown_site_fails_the_whole_load() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\n\
             KSC LC-39A,100,1,FT\n\
             Boca Chica,200,1,B5\n",
        );
        match load_file(file.path()).unwrap_err() {
            DataLoadError::InvalidRow { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("Boca Chica"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_negative_payload_and_bad_class() {
        let negative = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\nKSC LC-39A,-5,1,FT\n",
        );
        assert!(matches!(
            load_file(negative.path()).unwrap_err(),
            DataLoadError::InvalidRow { row: 1, .. }
        ));

        let bad_class = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\nKSC LC-39A,5,2,FT\n",
        );
        assert!(matches!(
            load_file(bad_class.path()).unwrap_err(),
            DataLoadError::InvalidRow { row: 1, .. }
        ));
    }

    #[test]
    fn non_numeric_payload_is_a_csv_error() {
        let file = write_temp(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\nKSC LC-39A,heavy,1,FT\n",
        );
        assert!(matches!(load_file(file.path()).unwrap_err(), DataLoadError::Csv(_)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = write_temp(".xlsx", "whatever");
        assert!(matches!(
            load_file(file.path()).unwrap_err(),
            DataLoadError::UnsupportedExtension(ext) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_records_oriented_json() {
        let file = write_temp(
            ".json",
            r#"[
                {"Flight Number": 7, "Launch Site": "VAFB SLC-4E", "class": 1,
                 "Payload Mass (kg)": 9600.0, "Booster Version Category": "FT"},
                {"site": "CCAFS LC-40", "class": 0, "payload_mass_kg": 500,
                 "booster_version_category": "v1.1"}
            ]"#,
        );
        let ds = load_file(file.path()).expect("load");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].flight_number, Some(7));
        assert_eq!(ds.records()[1].site, LaunchSite::CcafsLc40);
        assert_eq!(ds.min_payload(), 500.0);
    }

    #[test]
    fn json_object_missing_column_is_rejected() {
        let file = write_temp(".json", r#"[{"Launch Site": "KSC LC-39A", "class": 1}]"#);
        assert!(matches!(
            load_file(file.path()).unwrap_err(),
            DataLoadError::MissingColumn(_)
        ));
    }

    fn write_parquet(dir: &Path, fields: Vec<Field>, columns: Vec<ArrayRef>) -> PathBuf {
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("batch");

        let path = dir.join("launches.parquet");
        let file = File::create(&path).expect("create");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write");
        writer.close().expect("close");
        path
    }

    #[test]
    fn loads_parquet_with_integer_columns() {
        let dir = tempdir().expect("tempdir");
        let path = write_parquet(
            dir.path(),
            vec![
                Field::new("Flight Number", DataType::Int64, false),
                Field::new("Launch Site", DataType::Utf8, false),
                Field::new("class", DataType::Int64, false),
                Field::new("Payload Mass (kg)", DataType::Float64, false),
                Field::new("Booster Version Category", DataType::Utf8, false),
            ],
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec!["CCAFS LC-40", "KSC LC-39A", "KSC LC-39A"])),
                Arc::new(Int64Array::from(vec![0, 1, 1])),
                Arc::new(Float64Array::from(vec![500.0, 3000.0, 5300.0])),
                Arc::new(StringArray::from(vec!["v1.0", "FT", "B4"])),
            ],
        );

        let ds = load_file(&path).expect("load");
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[2].flight_number, Some(3));
        assert_eq!(ds.records()[1].outcome, Outcome::Success);
        assert_eq!(ds.max_payload(), 5300.0);
        assert_eq!(ds.records()[0].booster_version, None);
    }

    fn parquet_with_flight_number(dir: &Path, flight: f64) -> PathBuf {
        write_parquet(
            dir,
            vec![
                Field::new("Flight Number", DataType::Float64, false),
                Field::new("Launch Site", DataType::Utf8, false),
                Field::new("class", DataType::Float64, false),
                Field::new("Payload Mass (kg)", DataType::Float64, false),
                Field::new("Booster Version Category", DataType::Utf8, false),
            ],
            vec![
                Arc::new(Float64Array::from(vec![flight])),
                Arc::new(StringArray::from(vec!["KSC LC-39A"])),
                Arc::new(Float64Array::from(vec![1.0])),
                Arc::new(Float64Array::from(vec![3000.0])),
                Arc::new(StringArray::from(vec!["FT"])),
            ],
        )
    }

    #[test]
    fn parquet_flight_number_must_be_a_whole_u32() {
        for bad in [-1.0, 2.7, f64::NAN, f64::INFINITY, 5_000_000_000.0] {
            let dir = tempdir().expect("tempdir");
            let path = parquet_with_flight_number(dir.path(), bad);
            match load_file(&path).unwrap_err() {
                DataLoadError::InvalidRow { row, message } => {
                    assert_eq!(row, 1);
                    assert!(message.contains("flight number"), "{message}");
                }
                other => panic!("flight number {bad}: unexpected error {other}"),
            }
        }

        let dir = tempdir().expect("tempdir");
        let path = parquet_with_flight_number(dir.path(), 42.0);
        assert_eq!(load_file(&path).expect("load").records()[0].flight_number, Some(42));
    }

    #[test]
    fn parquet_null_in_required_column_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = write_parquet(
            dir.path(),
            vec![
                Field::new("Launch Site", DataType::Utf8, true),
                Field::new("class", DataType::Int64, false),
                Field::new("Payload Mass (kg)", DataType::Float64, false),
                Field::new("Booster Version Category", DataType::Utf8, false),
            ],
            vec![
                Arc::new(StringArray::from(vec![Some("KSC LC-39A"), None])),
                Arc::new(Int64Array::from(vec![1, 0])),
                Arc::new(Float64Array::from(vec![3000.0, 4000.0])),
                Arc::new(StringArray::from(vec!["FT", "B4"])),
            ],
        );

        match load_file(&path).unwrap_err() {
            DataLoadError::InvalidRow { row, message } => {
                assert_eq!(row, 2);
                assert!(message.contains("null value in 'Launch Site'"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn json_root_must_be_an_array() {
        let file = write_temp(".json", r#"{"Launch Site": "KSC LC-39A"}"#);
        assert!(matches!(
            load_file(file.path()).unwrap_err(),
            DataLoadError::InvalidRow { row: 0, .. }
        ));
    }
}
