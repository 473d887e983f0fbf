//! Aggregation Module
//! One parameterized group-by-sum shared by all drill-down levels.

use crate::data::Record;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Primary metric of an aggregation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Revenue,
    Quantity,
}

/// Accumulated totals for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotals {
    pub key: String,
    pub revenue: f64,
    pub quantity: u64,
    pub orders: usize,
}

impl GroupTotals {
    fn new(key: String) -> Self {
        Self {
            key,
            revenue: 0.0,
            quantity: 0,
            orders: 0,
        }
    }

    /// The group's value under the given primary measure.
    pub fn value(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Revenue => self.revenue,
            Measure::Quantity => self.quantity as f64,
        }
    }
}

/// Group totals in first-encounter order, plus the level's primary measure.
///
/// A filter matching zero records yields an empty aggregation, which is a
/// valid outcome distinct from any error.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    measure: Measure,
    entries: Vec<GroupTotals>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Aggregation {
    /// Group records by key and accumulate revenue, quantity and order
    /// count per group. Records whose key function yields `None` (e.g. no
    /// purchase category) are excluded.
    pub fn group_by<'a, I, K>(records: I, key_fn: K, measure: Measure) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
        K: Fn(&Record) -> Option<&str>,
    {
        let mut entries: Vec<GroupTotals> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for record in records {
            let Some(key) = key_fn(record) else {
                continue;
            };
            let slot = *index.entry(key.to_string()).or_insert_with(|| {
                entries.push(GroupTotals::new(key.to_string()));
                entries.len() - 1
            });
            let totals = &mut entries[slot];
            totals.revenue += record.revenue;
            totals.quantity += record.quantity;
            totals.orders += 1;
        }

        Self {
            measure,
            entries,
            index,
        }
    }

    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// Groups in first-encounter order.
    pub fn entries(&self) -> &[GroupTotals] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&GroupTotals> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Groups sorted descending by the primary measure. The sort is stable,
    /// so tied groups keep first-encounter order.
    pub fn sorted_desc(&self) -> Vec<&GroupTotals> {
        let mut sorted: Vec<&GroupTotals> = self.entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.value(self.measure)
                .partial_cmp(&a.value(self.measure))
                .unwrap_or(Ordering::Equal)
        });
        sorted
    }

    /// Top group under the primary measure. On a tie the first-encountered
    /// group wins: a later equal total never displaces an earlier one.
    pub fn top(&self) -> Option<&GroupTotals> {
        self.entries.iter().fold(None, |best, entry| match best {
            Some(current) if entry.value(self.measure) > current.value(self.measure) => {
                Some(entry)
            }
            None => Some(entry),
            _ => best,
        })
    }

    /// Sum of the primary measure across all groups.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value(self.measure)).sum()
    }
}
