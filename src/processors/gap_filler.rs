use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::{WeatherField, WeatherTable};

/// Missing-value counts around a gap filling pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillReport {
    pub table: String,
    pub missing_before: BTreeMap<WeatherField, usize>,
    pub missing_after: BTreeMap<WeatherField, usize>,
    /// (site_id, field) pairs without a single reading; these stay missing
    pub all_missing: Vec<(u32, WeatherField)>,
}

impl FillReport {
    pub fn filled_cells(&self) -> usize {
        let before: usize = self.missing_before.values().sum();
        let after: usize = self.missing_after.values().sum();
        before.saturating_sub(after)
    }

    pub fn remaining_missing(&self) -> usize {
        self.missing_after.values().sum()
    }
}

/// Fills missing readings by linear interpolation along each site's rows
pub struct GapFiller {
    fields: Vec<WeatherField>,
}

impl GapFiller {
    pub fn new() -> Self {
        Self {
            fields: WeatherField::ALL.to_vec(),
        }
    }

    pub fn with_fields(fields: Vec<WeatherField>) -> Self {
        Self { fields }
    }

    /// Interpolate every (site, field) sequence independently. Rows keep
    /// their positions; only missing values change.
    pub fn fill(&self, mut table: WeatherTable) -> (WeatherTable, FillReport) {
        let missing_before = self.count_missing(&table);
        let mut all_missing = Vec::new();

        for (site_id, indices) in table.partition_by_site() {
            for &field in &self.fields {
                let mut values: Vec<Option<f64>> = indices
                    .iter()
                    .map(|&i| field.get(&table.rows[i]))
                    .collect();

                if !interpolate_linear(&mut values) {
                    debug!(
                        "{}: site {} has no {} readings; column left missing",
                        table.name, site_id, field
                    );
                    all_missing.push((site_id, field));
                    continue;
                }

                for (&i, value) in indices.iter().zip(values) {
                    field.set(&mut table.rows[i], value);
                }
            }
            debug!("{}: filled site {} ({} rows)", table.name, site_id, indices.len());
        }

        let missing_after = self.count_missing(&table);
        let report = FillReport {
            table: table.name.clone(),
            missing_before,
            missing_after,
            all_missing,
        };
        info!(
            "{}: filled {} missing values, {} remain",
            report.table,
            report.filled_cells(),
            report.remaining_missing()
        );

        (table, report)
    }

    fn count_missing(&self, table: &WeatherTable) -> BTreeMap<WeatherField, usize> {
        self.fields
            .iter()
            .map(|&f| (f, table.missing_count(f)))
            .collect()
    }
}

impl Default for GapFiller {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear interpolation over positions. Leading gaps take the first reading
/// and trailing gaps the last one. Returns false, leaving the slice
/// untouched, when there is no reading at all.
pub fn interpolate_linear(values: &mut [Option<f64>]) -> bool {
    let known: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();

    let (Some(&first), Some(&last)) = (known.first(), known.last()) else {
        return false;
    };

    let first_value = values[first];
    let last_value = values[last];
    values[..first].fill(first_value);
    values[last + 1..].fill(last_value);

    for pair in known.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if right - left < 2 {
            continue;
        }
        let (Some(a), Some(b)) = (values[left], values[right]) else {
            continue;
        };
        let span = (right - left) as f64;
        for i in left + 1..right {
            let t = (i - left) as f64 / span;
            values[i] = Some(a + (b - a) * t);
        }
    }

    true
}
