use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-aligner")]
#[command(about = "Align, gap-fill and compact building weather data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the progress spinner")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align timestamps, fill gaps and compact the train and test weather tables
    Process {
        #[arg(long, help = "Weather train CSV")]
        train: PathBuf,

        #[arg(long, help = "Weather test CSV")]
        test: PathBuf,

        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        #[arg(short, long, value_enum, help = "Output format [default: from config, else csv]")]
        format: Option<OutputFormat>,

        #[arg(short, long, help = "Parquet compression: snappy, gzip, lz4, zstd or none")]
        compression: Option<String>,

        #[arg(
            long,
            help = "Where to write the per-site offsets as JSON [default: {output_dir}/site_offsets.json]"
        )]
        offsets_file: Option<PathBuf>,

        #[arg(long, help = "Configuration file (TOML, YAML or JSON)")]
        config: Option<PathBuf>,
    },

    /// Compute and print per-site timestamp offsets without writing tables
    Offsets {
        #[arg(long, help = "Weather train CSV")]
        train: PathBuf,

        #[arg(long, help = "Weather test CSV")]
        test: PathBuf,

        #[arg(long, help = "Also print the mean temperature rank per hour of day")]
        profile: bool,

        #[arg(long, help = "Configuration file (TOML, YAML or JSON)")]
        config: Option<PathBuf>,
    },

    /// Show row groups, compression and column types of a Parquet output
    Info {
        #[arg(short, long)]
        file: PathBuf,
    },
}
