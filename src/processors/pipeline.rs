use tracing::{info, warn};

use crate::config::AlignmentConfig;
use crate::models::{CompactTable, WeatherTable};
use crate::processors::{Compactor, GapFiller, PipelineReport, TimestampAligner};
use crate::utils::progress::ProgressReporter;

/// Corrected train and test tables plus everything learned on the way
#[derive(Debug)]
pub struct PipelineOutput {
    pub train: CompactTable,
    pub test: CompactTable,
    pub report: PipelineReport,
}

/// Runs align -> fill -> compact over the weather train and test tables
pub struct WeatherPipeline {
    aligner: TimestampAligner,
    gap_filler: GapFiller,
    compactor: Compactor,
}

impl WeatherPipeline {
    pub fn new() -> Self {
        Self {
            aligner: TimestampAligner::new(),
            gap_filler: GapFiller::new(),
            compactor: Compactor::new(),
        }
    }

    pub fn from_config(config: &AlignmentConfig) -> Self {
        Self::new().with_aligner(
            TimestampAligner::new()
                .with_peak_hour(config.peak_hour)
                .with_policy(config.offset_policy),
        )
    }

    pub fn with_aligner(mut self, aligner: TimestampAligner) -> Self {
        self.aligner = aligner;
        self
    }

    pub fn aligner(&self) -> &TimestampAligner {
        &self.aligner
    }

    pub fn run(
        &self,
        train: WeatherTable,
        test: WeatherTable,
        progress: Option<&ProgressReporter>,
    ) -> PipelineOutput {
        info!(
            "Processing {} train rows and {} test rows",
            train.len(),
            test.len()
        );

        if let Some(p) = progress {
            p.set_message("Aligning timestamps...");
        }
        let alignment = self.aligner.compute_offsets(&[&train, &test]);
        let train = self.aligner.apply(train, &alignment.offsets);
        let test = self.aligner.apply(test, &alignment.offsets);

        if let Some(p) = progress {
            p.set_message("Filling gaps...");
        }
        let (train, train_fill) = self.gap_filler.fill(train);
        let (test, test_fill) = self.gap_filler.fill(test);

        if let Some(p) = progress {
            p.set_message("Compacting columns...");
        }
        let (train, train_compaction) = self.compactor.compact(train);
        let (test, test_compaction) = self.compactor.compact(test);

        let report = PipelineReport::new(
            alignment,
            vec![train_fill, test_fill],
            vec![train_compaction, test_compaction],
        );
        for warning in &report.warnings {
            warn!("{}", warning);
        }

        if let Some(p) = progress {
            p.finish_with_message("Processing complete");
        }

        PipelineOutput {
            train,
            test,
            report,
        }
    }
}

impl Default for WeatherPipeline {
    fn default() -> Self {
        Self::new()
    }
}
