use half::f16;
use serde::Serialize;
use tracing::{debug, info};

use crate::models::{
    ColumnData, ColumnKind, CompactColumn, CompactTable, NumericWidth, WeatherColumn,
    WeatherTable, WEATHER_COLUMNS,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCompaction {
    pub column: String,
    pub kind: ColumnKind,
    /// None for non-numeric columns
    pub width: Option<NumericWidth>,
    /// Largest |narrowed - original| over the column's readings
    pub max_abs_error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactionReport {
    pub table: String,
    pub bytes_before: usize,
    pub bytes_after: usize,
    pub columns: Vec<ColumnCompaction>,
}

impl CompactionReport {
    pub fn reduction_percent(&self) -> f64 {
        if self.bytes_before == 0 {
            return 0.0;
        }
        100.0 * (self.bytes_before as f64 - self.bytes_after as f64) / self.bytes_before as f64
    }

    pub fn column(&self, name: &str) -> Option<&ColumnCompaction> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Narrows numeric columns to the smallest width that holds their range.
/// Integer columns round-trip exactly.
pub struct Compactor;

impl Compactor {
    pub fn new() -> Self {
        Self
    }

    /// Convert a filled table into its narrowest column-oriented form
    pub fn compact(&self, table: WeatherTable) -> (CompactTable, CompactionReport) {
        let bytes_before = table.memory_footprint();
        let mut columns = Vec::with_capacity(WEATHER_COLUMNS.len());
        let mut summaries = Vec::with_capacity(WEATHER_COLUMNS.len());

        for column in WEATHER_COLUMNS {
            let (data, max_abs_error) = match column {
                WeatherColumn::SiteId => {
                    let ids: Vec<i64> = table.rows.iter().map(|r| r.site_id as i64).collect();
                    (narrow_integers(&ids), 0.0)
                }
                WeatherColumn::Timestamp => (
                    ColumnData::Timestamp(table.rows.iter().map(|r| r.timestamp).collect()),
                    0.0,
                ),
                WeatherColumn::Field(field) => narrow_floats(&table.column_values(field)),
            };

            debug!(
                "{}.{}: {} (max abs error {})",
                table.name,
                column.name(),
                data.width().map_or("unchanged", |w| w.type_name()),
                max_abs_error
            );

            summaries.push(ColumnCompaction {
                column: column.name().to_string(),
                kind: column.kind(),
                width: data.width(),
                max_abs_error,
            });
            columns.push(CompactColumn::new(column.name(), data));
        }

        let compact = CompactTable {
            name: table.name,
            columns,
        };
        let report = CompactionReport {
            table: compact.name.clone(),
            bytes_before,
            bytes_after: compact.memory_footprint(),
            columns: summaries,
        };

        info!(
            "{}: memory usage {:.2} MB -> {:.2} MB ({:.1}% reduction)",
            report.table,
            report.bytes_before as f64 / 1_048_576.0,
            report.bytes_after as f64 / 1_048_576.0,
            report.reduction_percent()
        );

        (compact, report)
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new()
    }
}

/// First width whose bounds strictly contain [min, max]
pub fn select_width(kind: ColumnKind, min: f64, max: f64) -> Option<NumericWidth> {
    let candidates: &[NumericWidth] = match kind {
        ColumnKind::Integer => &NumericWidth::INTEGER_WIDTHS,
        ColumnKind::Float => &NumericWidth::FLOAT_WIDTHS,
        ColumnKind::NonNumeric => return None,
    };

    candidates.iter().copied().find(|w| {
        let (lo, hi) = w.bounds();
        min > lo && max < hi
    })
}

fn narrow_integers(values: &[i64]) -> ColumnData {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return ColumnData::Int64(Vec::new());
    };

    match select_width(ColumnKind::Integer, min as f64, max as f64) {
        Some(NumericWidth::Int8) => ColumnData::Int8(values.iter().map(|&v| v as i8).collect()),
        Some(NumericWidth::Int16) => {
            ColumnData::Int16(values.iter().map(|&v| v as i16).collect())
        }
        Some(NumericWidth::Int32) => {
            ColumnData::Int32(values.iter().map(|&v| v as i32).collect())
        }
        _ => ColumnData::Int64(values.to_vec()),
    }
}

/// Narrowing is decided on range alone: a column whose values all fit inside
/// `f16::MAX` becomes float16 even though float16 keeps only 11 significant
/// bits. The largest absolute error introduced is returned with the data.
fn narrow_floats(values: &[Option<f64>]) -> (ColumnData, f64) {
    let present = values.iter().flatten().copied();
    let range = present.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    });

    let width = range.and_then(|(min, max)| select_width(ColumnKind::Float, min, max));
    let raw = values.iter().map(|v| v.unwrap_or(f64::NAN));

    let data = match width {
        Some(NumericWidth::Float16) => ColumnData::Float16(raw.map(f16::from_f64).collect()),
        Some(NumericWidth::Float32) => ColumnData::Float32(raw.map(|v| v as f32).collect()),
        _ => ColumnData::Float64(raw.collect()),
    };

    let max_abs_error = data
        .decode_floats()
        .unwrap_or_default()
        .into_iter()
        .zip(values)
        .filter_map(|(narrowed, original)| Some((narrowed? - (*original)?).abs()))
        .fold(0.0, f64::max);

    (data, max_abs_error)
}
