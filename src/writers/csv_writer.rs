use crate::error::Result;
use crate::models::{ColumnData, CompactTable};
use crate::utils::constants::TIMESTAMP_FORMAT;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes compact tables as CSV, each value printed at its stored width
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_table(&self, table: &CompactTable, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(table, file)
    }

    pub fn write_to<W: Write>(&self, table: &CompactTable, sink: W) -> Result<()> {
        let mut writer = Writer::from_writer(sink);

        writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
        for row in 0..table.num_rows() {
            writer.write_record(table.columns.iter().map(|c| format_cell(&c.data, row)))?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Missing floats become empty cells
fn format_cell(data: &ColumnData, row: usize) -> String {
    match data {
        ColumnData::Int8(v) => v[row].to_string(),
        ColumnData::Int16(v) => v[row].to_string(),
        ColumnData::Int32(v) => v[row].to_string(),
        ColumnData::Int64(v) => v[row].to_string(),
        ColumnData::Float16(v) if v[row].is_nan() => String::new(),
        ColumnData::Float16(v) => v[row].to_string(),
        ColumnData::Float32(v) if v[row].is_nan() => String::new(),
        ColumnData::Float32(v) => v[row].to_string(),
        ColumnData::Float64(v) if v[row].is_nan() => String::new(),
        ColumnData::Float64(v) => v[row].to_string(),
        ColumnData::Timestamp(v) => v[row].format(TIMESTAMP_FORMAT).to_string(),
    }
}
