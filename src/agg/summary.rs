//! Dataset Summary Module
//! Whole-dataset totals shown when a session starts.

use crate::data::Record;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

/// Load-time overview of the normalized dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub orders: usize,
    pub skipped: usize,
    pub total_revenue: f64,
    pub total_units: u64,
    pub cities: usize,
    pub products: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl DatasetSummary {
    pub fn compute(records: &[Record], skipped: usize) -> Self {
        let total_revenue: f64 = records.par_iter().map(|r| r.revenue).sum();
        let total_units: u64 = records.par_iter().map(|r| r.quantity).sum();

        let cities: HashSet<&str> = records.iter().map(|r| r.city.as_str()).collect();
        let products: HashSet<&str> = records.iter().map(|r| r.product.as_str()).collect();

        // Dateless rows are tolerated and simply ignored for the range.
        let first_date = records.iter().filter_map(|r| r.date).min();
        let last_date = records.iter().filter_map(|r| r.date).max();

        Self {
            orders: records.len(),
            skipped,
            total_revenue,
            total_units,
            cities: cities.len(),
            products: products.len(),
            first_date,
            last_date,
        }
    }
}
