pub mod csv_writer;
pub mod parquet_writer;
pub mod report_writer;

pub use csv_writer::CsvWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use report_writer::JsonReportWriter;
