use crate::config::OutputFormat;
use std::path::{Path, PathBuf};

/// Output path for a processed table: `{dir}/{table}_aligned.{ext}`
pub fn aligned_table_path(output_dir: &Path, table_name: &str, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}_aligned.{}", table_name, format.extension()))
}

/// Alignment report written next to the tables when no explicit path is given
pub fn default_offsets_path(output_dir: &Path) -> PathBuf {
    output_dir.join("site_offsets.json")
}
