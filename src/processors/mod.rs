pub mod compactor;
pub mod gap_filler;
pub mod pipeline;
pub mod report;
pub mod timestamp_aligner;

pub use compactor::{ColumnCompaction, CompactionReport, Compactor};
pub use gap_filler::{FillReport, GapFiller};
pub use pipeline::{PipelineOutput, WeatherPipeline};
pub use report::{PipelineReport, PipelineWarning};
pub use timestamp_aligner::{
    AlignmentOutcome, HourlyRankProfile, OffsetPolicy, SiteOffsets, TimestampAligner,
};
