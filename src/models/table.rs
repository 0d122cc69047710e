use std::collections::BTreeMap;

use crate::models::{WeatherField, WeatherObservation, WEATHER_COLUMNS};

/// Bytes per row of a freshly loaded table: every column is 64 bits wide.
pub const LOADED_ROW_BYTES: usize = WEATHER_COLUMNS.len() * 8;

/// An ordered weather table as read from one source file
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherTable {
    pub name: String,
    pub rows: Vec<WeatherObservation>,
}

impl WeatherTable {
    pub fn new(name: impl Into<String>, rows: Vec<WeatherObservation>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row indices per site, each list in original row order
    pub fn partition_by_site(&self) -> BTreeMap<u32, Vec<usize>> {
        let mut partitions: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (index, row) in self.rows.iter().enumerate() {
            partitions.entry(row.site_id).or_default().push(index);
        }
        partitions
    }

    pub fn missing_count(&self, field: WeatherField) -> usize {
        self.rows.iter().filter(|r| field.get(r).is_none()).count()
    }

    pub fn total_missing(&self) -> usize {
        self.rows.iter().map(|r| r.missing_fields()).sum()
    }

    pub fn column_values(&self, field: WeatherField) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| field.get(r)).collect()
    }

    /// In-memory size of the table at full 64-bit width
    pub fn memory_footprint(&self) -> usize {
        self.rows.len() * LOADED_ROW_BYTES
    }
}
