use crate::error::{ProcessingError, Result};
use crate::models::{ColumnData, CompactTable};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Writes compact tables to Parquet, keeping each column's narrowed type
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    pub fn write_table(&self, table: &CompactTable, path: &Path) -> Result<()> {
        let batch = self.table_to_batch(table)?;

        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(())
    }

    fn table_to_batch(&self, table: &CompactTable) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(table.columns.len());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns.len());

        for column in &table.columns {
            let (data_type, nullable, array) = column_to_array(&column.data);
            fields.push(Field::new(column.name.as_str(), data_type, nullable));
            arrays.push(array);
        }

        let schema = Arc::new(Schema::new(fields));
        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
        let metadata = builder.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        let row_group_sizes = metadata
            .row_groups()
            .iter()
            .map(|rg| rg.num_rows())
            .collect();

        // An empty file has no column chunks to read the codec from
        let compression = metadata
            .row_groups()
            .first()
            .and_then(|rg| rg.columns().first())
            .map(|c| c.compression())
            .unwrap_or(self.compression);

        let columns = builder
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().clone(), f.data_type().clone()))
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression,
            columns,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Missing floats are stored as NaN in memory and written as nulls
fn column_to_array(data: &ColumnData) -> (DataType, bool, ArrayRef) {
    match data {
        ColumnData::Int8(v) => (DataType::Int8, false, Arc::new(Int8Array::from(v.clone()))),
        ColumnData::Int16(v) => (DataType::Int16, false, Arc::new(Int16Array::from(v.clone()))),
        ColumnData::Int32(v) => (DataType::Int32, false, Arc::new(Int32Array::from(v.clone()))),
        ColumnData::Int64(v) => (DataType::Int64, false, Arc::new(Int64Array::from(v.clone()))),
        ColumnData::Float16(v) => {
            let array: Float16Array = v.iter().map(|x| (!x.is_nan()).then_some(*x)).collect();
            (DataType::Float16, true, Arc::new(array))
        }
        ColumnData::Float32(v) => {
            let array: Float32Array = v.iter().map(|x| (!x.is_nan()).then_some(*x)).collect();
            (DataType::Float32, true, Arc::new(array))
        }
        ColumnData::Float64(v) => {
            let array: Float64Array = v.iter().map(|x| (!x.is_nan()).then_some(*x)).collect();
            (DataType::Float64, true, Arc::new(array))
        }
        ColumnData::Timestamp(v) => {
            let millis: Vec<i64> = v.iter().map(|t| t.and_utc().timestamp_millis()).collect();
            (
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
                Arc::new(TimestampMillisecondArray::from(millis)),
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
    pub columns: Vec<(String, DataType)>,
}

impl ParquetFileInfo {
    pub fn column_type(&self, name: &str) -> Option<&DataType> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, data_type)| data_type)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}\n\
            - Columns:",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            self.total_rows as f64 / self.row_groups.max(1) as f64
        );
        for (name, data_type) in &self.columns {
            summary.push_str(&format!("\n    {:<20} {}", name, data_type));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompactColumn;
    use chrono::NaiveDate;
    use half::f16;
    use tempfile::NamedTempFile;

    fn sample_table() -> CompactTable {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let timestamps = (0..3).map(|h| start + chrono::Duration::hours(h)).collect();
        CompactTable {
            name: "weather_train".to_string(),
            columns: vec![
                CompactColumn::new("site_id", ColumnData::Int8(vec![0, 0, 1])),
                CompactColumn::new("timestamp", ColumnData::Timestamp(timestamps)),
                CompactColumn::new(
                    "air_temperature",
                    ColumnData::Float16(vec![
                        f16::from_f64(25.0),
                        f16::NAN,
                        f16::from_f64(-3.5),
                    ]),
                ),
                CompactColumn::new("precip_depth_1_hr", ColumnData::Int16(vec![-1, 0, 343])),
            ],
        }
    }

    #[test]
    fn test_write_keeps_narrow_types() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;

        writer.write_table(&sample_table(), temp_file.path())?;
        let info = writer.get_file_info(temp_file.path())?;

        assert_eq!(info.total_rows, 3);
        assert_eq!(info.columns.len(), 4);
        assert_eq!(info.column_type("site_id"), Some(&DataType::Int8));
        assert_eq!(info.column_type("air_temperature"), Some(&DataType::Float16));
        assert_eq!(info.column_type("precip_depth_1_hr"), Some(&DataType::Int16));
        Ok(())
    }

    #[test]
    fn test_missing_floats_are_written_as_nulls() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        ParquetWriter::new().write_table(&sample_table(), temp_file.path())?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(temp_file.path())?)?
            .build()?;
        let mut nulls = 0;
        for batch in reader {
            let batch = batch?;
            let column = batch
                .column_by_name("air_temperature")
                .expect("air_temperature column");
            nulls += column.null_count();
        }
        assert_eq!(nulls, 1);
        Ok(())
    }

    #[test]
    fn test_compression_options() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let writer = ParquetWriter::new()
            .with_compression("zstd")?
            .with_row_group_size(2);

        writer.write_table(&sample_table(), temp_file.path())?;
        let info = writer.get_file_info(temp_file.path())?;

        assert_eq!(info.row_groups, 2);
        assert_eq!(info.row_group_sizes, vec![2, 1]);
        assert!(matches!(info.compression, Compression::ZSTD(_)));
        assert!(info.summary().contains("air_temperature"));
        Ok(())
    }

    #[test]
    fn test_unknown_compression_is_rejected() {
        assert!(ParquetWriter::new().with_compression("brotli9000").is_err());
    }
}
