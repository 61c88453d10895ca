//! Launch dataset loading.
//!
//! The CSV is fetched once at startup, decoded through arrow's CSV reader and
//! flattened into `LaunchRecord`s. Any unusable input is a hard error: there
//! is no retry and no partial load.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::DataType;

use crate::types::{LaunchRecord, Outcome, PayloadRange};

/// Public copy of the SpaceX launch dataset.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/spacex_launch_dash.csv";

pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_CLASS: &str = "class";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

const BATCH_SIZE: usize = 8192;

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// `http(s)://` arguments are URLs, anything else is a local path.
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("http://") || arg.starts_with("https://") {
            Self::Url(arg.to_string())
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    /// Fetch the raw CSV bytes.
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        match self {
            Self::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .with_context(|| format!("failed to fetch {url}"))?
                    .error_for_status()
                    .with_context(|| format!("bad response from {url}"))?;
                let bytes = response
                    .bytes()
                    .await
                    .with_context(|| format!("failed to read body of {url}"))?;
                Ok(bytes.to_vec())
            }
            Self::Path(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        Self::Url(DEFAULT_DATA_URL.to_string())
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Immutable in-memory launch table plus the state derived from it at load.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    sites: Vec<String>,
    payload_bounds: (f64, f64),
}

impl Dataset {
    /// Fetch and parse the dataset. Called once at startup.
    pub async fn load(source: &DataSource) -> Result<Arc<Self>> {
        tracing::info!(%source, "loading launch dataset");
        let bytes = source.fetch().await?;
        let dataset = Self::from_csv_bytes(&bytes)
            .with_context(|| format!("malformed launch dataset at {source}"))?;
        tracing::info!(
            records = dataset.len(),
            sites = dataset.sites.len(),
            min_payload = dataset.payload_bounds.0,
            max_payload = dataset.payload_bounds.1,
            "dataset loaded"
        );
        Ok(Arc::new(dataset))
    }

    /// Parse a CSV document with a header row.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let format = Format::default().with_header(true);
        let (schema, _) = format
            .infer_schema(Cursor::new(bytes), None)
            .context("failed to infer CSV schema")?;

        for required in [COL_LAUNCH_SITE, COL_PAYLOAD, COL_CLASS, COL_BOOSTER_CATEGORY] {
            if schema.index_of(required).is_err() {
                bail!("missing column {required:?}");
            }
        }

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_header(true)
            .with_batch_size(BATCH_SIZE)
            .build(Cursor::new(bytes))
            .context("failed to open CSV reader")?;

        let mut records = Vec::new();
        let mut row_offset = 0usize;
        for batch in reader {
            let batch = batch.context("failed to decode CSV batch")?;
            decode_batch(&batch, row_offset, &mut records)?;
            row_offset += batch.num_rows();
        }

        Ok(Self::from_records(records))
    }

    /// Build a dataset from already-typed records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut sites = Vec::new();
        for record in &records {
            if seen.insert(record.launch_site.as_str()) {
                sites.push(record.launch_site.clone());
            }
        }

        let payload_bounds = if records.is_empty() {
            (0.0, 0.0)
        } else {
            records.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.payload_mass_kg), hi.max(r.payload_mass_kg))
            })
        };

        Self {
            records,
            sites,
            payload_bounds,
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Distinct launch sites in first-appearance order.
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn min_payload(&self) -> f64 {
        self.payload_bounds.0
    }

    pub fn max_payload(&self) -> f64 {
        self.payload_bounds.1
    }

    /// The full `[min, max]` payload range of the dataset.
    pub fn payload_bounds(&self) -> PayloadRange {
        PayloadRange::new(self.payload_bounds.0, self.payload_bounds.1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Column decoding ──────────────────────────────────────────────────────

fn decode_batch(batch: &RecordBatch, row_offset: usize, out: &mut Vec<LaunchRecord>) -> Result<()> {
    let sites = column_as(batch, COL_LAUNCH_SITE, &DataType::Utf8)?;
    let payloads = column_as(batch, COL_PAYLOAD, &DataType::Float64)?;
    // Float64 so fractional classes are seen rather than truncated by the cast.
    let classes = column_as(batch, COL_CLASS, &DataType::Float64)?;
    let categories = column_as(batch, COL_BOOSTER_CATEGORY, &DataType::Utf8)?;

    let flights = optional_column(batch, COL_FLIGHT_NUMBER, &DataType::Int64)?;
    let flights = flights
        .as_ref()
        .and_then(|c| c.as_any().downcast_ref::<Int64Array>());
    let versions = optional_column(batch, COL_BOOSTER_VERSION, &DataType::Utf8)?;
    let versions = versions
        .as_ref()
        .and_then(|c| c.as_any().downcast_ref::<StringArray>());

    let sites = sites.as_any().downcast_ref::<StringArray>().context("site column")?;
    let payloads = payloads
        .as_any()
        .downcast_ref::<Float64Array>()
        .context("payload column")?;
    let classes = classes
        .as_any()
        .downcast_ref::<Float64Array>()
        .context("class column")?;
    let categories = categories
        .as_any()
        .downcast_ref::<StringArray>()
        .context("booster category column")?;

    out.reserve(batch.num_rows());
    for row in 0..batch.num_rows() {
        let line = row_offset + row + 1;
        let class = classes.value(row);
        let outcome = match Outcome::from_class(class as i64) {
            Some(outcome) if class.fract() == 0.0 => outcome,
            _ => bail!("row {line}: class must be 0 or 1, got {class}"),
        };
        let payload = payloads.value(row);
        if !payload.is_finite() {
            bail!("row {line}: payload mass must be a finite number, got {payload}");
        }

        out.push(LaunchRecord {
            flight_number: flights.filter(|a| !a.is_null(row)).map(|a| a.value(row)),
            launch_site: sites.value(row).to_string(),
            payload_mass_kg: payload,
            outcome,
            booster_version: versions
                .filter(|a| !a.is_null(row))
                .map(|a| a.value(row).to_string()),
            booster_category: categories.value(row).to_string(),
        });
    }

    Ok(())
}

/// Fetch a required column, cast it to `target` and reject nulls (which is
/// also how unparseable cells surface after a safe cast).
fn column_as(batch: &RecordBatch, name: &str, target: &DataType) -> Result<ArrayRef> {
    let raw = batch
        .column_by_name(name)
        .with_context(|| format!("missing column {name:?}"))?;
    let typed = cast(raw, target).with_context(|| format!("column {name:?} is not {target}"))?;
    if typed.null_count() > 0 {
        let row = (0..typed.len()).find(|&i| typed.is_null(i)).unwrap_or(0);
        bail!("column {name:?} has an empty or invalid value in batch row {}", row + 1);
    }
    Ok(typed)
}

fn optional_column(batch: &RecordBatch, name: &str, target: &DataType) -> Result<Option<ArrayRef>> {
    match batch.column_by_name(name) {
        Some(raw) => {
            let typed = cast(raw, target).with_context(|| format!("column {name:?} is not {target}"))?;
            Ok(Some(typed))
        }
        None => Ok(None),
    }
}
