//! Episode file loading
//!
//! Reads raw episode records from JSON arrays or Parquet files. Several files
//! are read in parallel with rayon and concatenated in the order given, so
//! record indices stay deterministic between runs.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::record_batch::RecordBatch;
use arrow::temporal_conversions::date32_to_datetime;
use arrow_schema::DataType;
use indicatif::ParallelProgressIterator;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rayon::prelude::*;

use crate::error::{AnalyticsError, Result};
use crate::models::{RawEpisode, RawWeekday};
use crate::utils::logging::{
    create_file_progress_bar, finish_progress_bar, log_load_complete, log_load_start, log_warning,
};

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Batch size from the `PARQUET_BATCH_SIZE` environment variable, if set
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("PARQUET_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&size| size > 0)
}

const NAME: &str = "nome";
const HEALTH_CARD: &str = "cns";
const ADMISSION: &str = "data_admissao";
const DISCHARGE: &str = "data_alta";
const LENGTH_OF_STAY: &str = "dias_internacao";
const DISCHARGE_WEEKDAY: &str = "dia_semana_alta";

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| AnalyticsError::io(path, e))
}

/// Load a JSON array of episode records
pub fn load_episodes_json(path: &Path) -> Result<Vec<RawEpisode>> {
    let start = Instant::now();
    log_load_start("JSON", path);

    let reader = BufReader::new(open_file(path)?);
    let records: Vec<RawEpisode> = serde_json::from_reader(reader)?;

    log_load_complete(path, records.len(), start.elapsed());
    Ok(records)
}

/// Load episode records from a Parquet file
///
/// Only `data_admissao` is required; every other known column may be
/// missing, in which case the field is unset on every record.
pub fn load_episodes_parquet(path: &Path) -> Result<Vec<RawEpisode>> {
    let start = Instant::now();
    log_load_start("Parquet", path);

    let reader = ParquetRecordBatchReaderBuilder::try_new(open_file(path)?)?
        .with_batch_size(get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE))
        .build()?;

    let mut records = Vec::new();
    for batch in reader {
        records.extend(episodes_from_batch(&batch?)?);
    }

    log_load_complete(path, records.len(), start.elapsed());
    Ok(records)
}

/// Convert one Arrow record batch into raw episode records
pub fn episodes_from_batch(batch: &RecordBatch) -> Result<Vec<RawEpisode>> {
    if batch.column_by_name(ADMISSION).is_none() {
        return Err(AnalyticsError::schema(ADMISSION, "required column is missing"));
    }

    let rows = batch.num_rows();
    let names = text_column(batch, NAME)?;
    let cards = text_column(batch, HEALTH_CARD)?;
    let admissions = date_column(batch, ADMISSION)?;
    let discharges = date_column(batch, DISCHARGE)?;
    let lengths = float_column(batch, LENGTH_OF_STAY)?;
    let weekdays = weekday_column(batch, DISCHARGE_WEEKDAY)?;

    let mut records = Vec::with_capacity(rows);
    for row in 0..rows {
        records.push(RawEpisode {
            nome: names[row].clone(),
            cns: cards[row].clone(),
            data_admissao: admissions[row].clone(),
            data_alta: discharges[row].clone(),
            dias_internacao: lengths[row],
            dia_semana_alta: weekdays[row].clone(),
        });
    }
    Ok(records)
}

fn column_values<T>(
    array: &dyn Array,
    column: &str,
    extract: impl Fn(usize) -> Option<T>,
) -> Vec<Option<T>> {
    log::trace!("Reading {} values from column {column}", array.len());
    (0..array.len())
        .map(|i| if array.is_null(i) { None } else { extract(i) })
        .collect()
}

fn downcast<'a, A: 'static>(array: &'a ArrayRef, column: &str) -> Result<&'a A> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or_else(|| AnalyticsError::schema(column, "unexpected array type after conversion"))
}

/// Utf8 and LargeUtf8 columns; a missing column gives all `None`
fn text_column(batch: &RecordBatch, column: &str) -> Result<Vec<Option<String>>> {
    let Some(array) = batch.column_by_name(column) else {
        return Ok(vec![None; batch.num_rows()]);
    };

    let array = match array.data_type() {
        DataType::Utf8 => array.clone(),
        DataType::LargeUtf8 | DataType::Int32 | DataType::Int64 => cast(array, &DataType::Utf8)?,
        other => {
            return Err(AnalyticsError::schema(
                column,
                format!("expected a string column, found {other}"),
            ));
        }
    };

    let strings = downcast::<StringArray>(&array, column)?;
    Ok(column_values(strings, column, |i| {
        Some(strings.value(i).to_string())
    }))
}

/// Dates as `YYYY-MM-DD` strings, from string or Date32/Date64 columns
fn date_column(batch: &RecordBatch, column: &str) -> Result<Vec<Option<String>>> {
    let Some(array) = batch.column_by_name(column) else {
        return Ok(vec![None; batch.num_rows()]);
    };

    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => text_column(batch, column),
        DataType::Date32 | DataType::Date64 => {
            let array = cast(array, &DataType::Date32)?;
            let dates = downcast::<Date32Array>(&array, column)?;
            Ok(column_values(dates, column, |i| {
                date32_to_datetime(dates.value(i)).map(|dt| dt.date().format("%Y-%m-%d").to_string())
            }))
        }
        other => Err(AnalyticsError::schema(
            column,
            format!("expected a string or date column, found {other}"),
        )),
    }
}

/// Any integer or floating point column, widened to `f64`
fn float_column(batch: &RecordBatch, column: &str) -> Result<Vec<Option<f64>>> {
    let Some(array) = batch.column_by_name(column) else {
        return Ok(vec![None; batch.num_rows()]);
    };

    if !array.data_type().is_numeric() {
        return Err(AnalyticsError::schema(
            column,
            format!("expected a numeric column, found {}", array.data_type()),
        ));
    }

    let array = cast(array, &DataType::Float64)?;
    let values = downcast::<Float64Array>(&array, column)?;
    Ok(column_values(values, column, |i| Some(values.value(i))))
}

/// Weekday numbers from integer columns, weekday names from string columns
fn weekday_column(batch: &RecordBatch, column: &str) -> Result<Vec<Option<RawWeekday>>> {
    let Some(array) = batch.column_by_name(column) else {
        return Ok(vec![None; batch.num_rows()]);
    };

    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => Ok(text_column(batch, column)?
            .into_iter()
            .map(|name| name.map(RawWeekday::Name))
            .collect()),
        dt if dt.is_integer() => {
            let array = cast(array, &DataType::Int64)?;
            let numbers = downcast::<Int64Array>(&array, column)?;
            Ok(column_values(numbers, column, |i| {
                Some(RawWeekday::Number(numbers.value(i)))
            }))
        }
        other => Err(AnalyticsError::schema(
            column,
            format!("expected an integer or string column, found {other}"),
        )),
    }
}

/// Load one episode file, choosing the reader by extension
pub fn load_episode_file(path: &Path) -> Result<Vec<RawEpisode>> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => load_episodes_json(path),
        Some("parquet") => load_episodes_parquet(path),
        _ => Err(AnalyticsError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn is_episode_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("parquet"))
}

/// Supported episode files directly inside `dir`, sorted by path
pub fn find_episode_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AnalyticsError::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "directory does not exist"),
        ));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AnalyticsError::io(dir, e))? {
        let path = entry.map_err(|e| AnalyticsError::io(dir, e))?.path();
        if is_episode_file(&path) {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        log_warning("No episode files found in", Some(dir));
    } else {
        log::info!("Found {} episode files in {}", files.len(), dir.display());
    }
    Ok(files)
}

/// Load several episode files in parallel
///
/// # Arguments
/// * `paths` - JSON or Parquet episode files
///
/// # Returns
/// All records concatenated in the order of `paths`. The first failing file
/// aborts the load with its error.
pub fn load_episode_files_parallel(paths: &[PathBuf]) -> Result<Vec<RawEpisode>> {
    if paths.is_empty() {
        return Ok(Vec::new());
    }

    let pb = create_file_progress_bar(paths.len() as u64, Some("Loading episode files"));
    let results: Vec<Result<Vec<RawEpisode>>> = paths
        .par_iter()
        .progress_with(pb.clone())
        .map(|path| load_episode_file(path))
        .collect();
    finish_progress_bar(&pb, Some("Episode files loaded"));

    let mut records = Vec::new();
    for result in results {
        records.extend(result?);
    }

    log::info!(
        "Loaded {} episode records from {} files",
        records.len(),
        paths.len()
    );
    Ok(records)
}
