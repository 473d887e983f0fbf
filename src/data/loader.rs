//! CSV Dataset Loader Module
//! Reads the orders table with Polars and normalizes it into records.

use polars::prelude::*;
use rayon::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use super::normalize::{
    self, RawRow, Record, SkipReason, COL_CITY, COL_DATE, COL_PRICE, COL_PRODUCT,
    COL_PURCHASE_TYPE, COL_QUANTITY,
};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("required column `{0}` is missing")]
    MissingColumn(&'static str),
}

/// A row rejected during normalization, kept for diagnostic surfacing.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based position among the data rows.
    pub row: usize,
    pub reason: SkipReason,
}

/// Result of a dataset load: the valid records in source order plus the
/// rows that failed validation. Row defects never abort the load.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRow>,
}

/// Loads the orders CSV and produces normalized records.
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a CSV file and normalize every row.
    ///
    /// An unreadable or unparseable file is fatal; individual malformed
    /// rows are skipped, logged, and reported in the outcome.
    pub fn load(path: &Path) -> Result<LoadOutcome, LoaderError> {
        // Schema inference off: every column arrives as strings and the
        // normalizer performs its own strict coercion.
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        Self::normalize(&df)
    }

    /// Normalize an already-parsed table of string columns.
    pub fn normalize(df: &DataFrame) -> Result<LoadOutcome, LoaderError> {
        let city = required_column(df, COL_CITY)?;
        let product = required_column(df, COL_PRODUCT)?;
        let purchase_type = required_column(df, COL_PURCHASE_TYPE)?;
        let price = required_column(df, COL_PRICE)?;
        let quantity = required_column(df, COL_QUANTITY)?;
        // Date column is optional; without it every record is dateless.
        let date = df.column(COL_DATE).ok().and_then(|col| col.str().ok());

        let raw_rows: Vec<RawRow> = (0..df.height())
            .map(|i| RawRow {
                city: get_string(city, i),
                product: get_string(product, i),
                purchase_type: get_string(purchase_type, i),
                price: get_string(price, i),
                quantity: get_string(quantity, i),
                date: date.and_then(|ca| get_string(ca, i)),
            })
            .collect();

        // Order-preserving parallel coercion; indexed collect keeps the
        // source row order intact.
        let results: Vec<Result<Record, SkipReason>> = raw_rows
            .par_iter()
            .map(normalize::normalize_row)
            .collect();

        let mut records = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for (i, result) in results.into_iter().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(row = i + 1, "skipped row: {reason}");
                    skipped.push(SkippedRow { row: i + 1, reason });
                }
            }
        }

        info!(
            orders = records.len(),
            skipped = skipped.len(),
            "dataset normalized"
        );

        Ok(LoadOutcome { records, skipped })
    }
}

fn required_column<'a>(
    df: &'a DataFrame,
    name: &'static str,
) -> Result<&'a StringChunked, LoaderError> {
    let col = df
        .column(name)
        .map_err(|_| LoaderError::MissingColumn(name))?;
    Ok(col.str()?)
}

fn get_string(ca: &StringChunked, i: usize) -> Option<String> {
    ca.get(i).map(str::to_owned)
}
