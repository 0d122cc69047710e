use serde::Serialize;

use crate::models::WeatherField;
use crate::processors::{AlignmentOutcome, CompactionReport, FillReport};

/// Recoverable data conditions met while processing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    /// No air temperature anywhere for these sites; their timestamps were not shifted
    AlignmentUndefined { site_ids: Vec<u32> },
    /// A site has no reading at all for a column; the column stays missing for that site
    AllMissingColumn {
        table: String,
        site_id: u32,
        column: WeatherField,
    },
    /// Repeated (site_id, timestamp) rows ignored when ranking temperatures
    DuplicateKey { count: usize },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::AlignmentUndefined { site_ids } => {
                write!(f, "alignment undefined for sites {:?}", site_ids)
            }
            PipelineWarning::AllMissingColumn {
                table,
                site_id,
                column,
            } => write!(f, "{}: site {} has no {} readings", table, site_id, column),
            PipelineWarning::DuplicateKey { count } => {
                write!(f, "{} duplicate (site_id, timestamp) rows ignored", count)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub alignment: AlignmentOutcome,
    pub fill: Vec<FillReport>,
    pub compaction: Vec<CompactionReport>,
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineReport {
    pub fn new(
        alignment: AlignmentOutcome,
        fill: Vec<FillReport>,
        compaction: Vec<CompactionReport>,
    ) -> Self {
        let mut warnings = Vec::new();

        if alignment.duplicate_keys > 0 {
            warnings.push(PipelineWarning::DuplicateKey {
                count: alignment.duplicate_keys,
            });
        }
        if !alignment.undefined_sites.is_empty() {
            warnings.push(PipelineWarning::AlignmentUndefined {
                site_ids: alignment.undefined_sites.clone(),
            });
        }
        for report in &fill {
            warnings.extend(report.all_missing.iter().map(|&(site_id, column)| {
                PipelineWarning::AllMissingColumn {
                    table: report.table.clone(),
                    site_id,
                    column,
                }
            }));
        }

        Self {
            alignment,
            fill,
            compaction,
            warnings,
        }
    }

    /// Human readable summary
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Weather Alignment Report ===\n");
        summary.push_str(&format!(
            "Peak hour: {} ({:?} offsets)\n",
            self.alignment.peak_hour, self.alignment.policy
        ));
        summary.push_str(&format!(
            "Sites aligned: {}\n",
            self.alignment.offsets.len()
        ));
        for (site_id, offset) in &self.alignment.offsets {
            summary.push_str(&format!("  site {:>3}: {:+} h\n", site_id, offset));
        }

        summary.push_str("\nGap filling:\n");
        for report in &self.fill {
            summary.push_str(&format!(
                "  {}: filled {} values, {} still missing\n",
                report.table,
                report.filled_cells(),
                report.remaining_missing()
            ));
        }

        summary.push_str("\nCompaction:\n");
        for report in &self.compaction {
            summary.push_str(&format!(
                "  {}: {:.2} MB -> {:.2} MB ({:.1}% reduction)\n",
                report.table,
                report.bytes_before as f64 / 1_048_576.0,
                report.bytes_after as f64 / 1_048_576.0,
                report.reduction_percent()
            ));
            for column in &report.columns {
                if let Some(width) = column.width {
                    summary.push_str(&format!(
                        "    {:<20} {:<8} max error {}\n",
                        column.column, width, column.max_abs_error
                    ));
                }
            }
        }

        summary.push_str(&format!("\nWarnings: {}\n", self.warnings.len()));
        for (i, warning) in self.warnings.iter().take(10).enumerate() {
            summary.push_str(&format!("  {}. {}\n", i + 1, warning));
        }

        summary
    }
}
