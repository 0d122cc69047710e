pub mod constants;
pub mod filename;
pub mod progress;
pub mod timestamp_format;

pub use constants::*;
pub use filename::{aligned_table_path, default_offsets_path};
pub use progress::ProgressReporter;
pub use timestamp_format::parse_timestamp;
