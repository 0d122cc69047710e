use crate::cli::args::{Cli, Commands};
use crate::config::{OutputConfig, OutputFormat, PipelineConfig};
use crate::error::{ProcessingError, Result};
use crate::models::CompactTable;
use crate::processors::WeatherPipeline;
use crate::readers::ConcurrentReader;
use crate::utils::constants::HOURS_PER_DAY;
use crate::utils::filename::{aligned_table_path, default_offsets_path};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, JsonReportWriter, ParquetWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the defaults; a log file replaces stderr output
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_filter = if verbose {
        "weather_aligner=debug,info"
    } else {
        "weather_aligner=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), None)
        }
        None => (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Process {
            train,
            test,
            output_dir,
            format,
            compression,
            offsets_file,
            config,
        } => {
            let mut config = PipelineConfig::load(config.as_deref())?;
            if let Some(format) = format {
                config.output.format = format;
            }
            if let Some(compression) = compression {
                config.output.compression = compression;
            }

            println!("Processing weather data...");
            println!("Train file: {}", train.display());
            println!("Test file: {}", test.display());
            println!("Output directory: {}", output_dir.display());

            let progress = ProgressReporter::new_spinner("Reading weather files...", cli.quiet);
            let (train_table, test_table) = ConcurrentReader::new()
                .read_train_test(&train, &test)
                .await?;

            let pipeline = WeatherPipeline::from_config(&config.alignment);
            let output = pipeline.run(train_table, test_table, Some(&progress));

            println!("\n{}", output.report.generate_summary());

            std::fs::create_dir_all(&output_dir)?;
            for table in [&output.train, &output.test] {
                let path = aligned_table_path(&output_dir, &table.name, config.output.format);
                write_table(table, &path, &config.output)?;
                println!("Wrote {} rows to {}", table.num_rows(), path.display());
            }

            let offsets_path = offsets_file.unwrap_or_else(|| default_offsets_path(&output_dir));
            if let Some(parent) = offsets_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            JsonReportWriter::new().write_report(&output.report.alignment, &offsets_path)?;
            println!("Wrote site offsets to {}", offsets_path.display());

            println!("Processing complete!");
        }

        Commands::Offsets {
            train,
            test,
            profile,
            config,
        } => {
            let config = PipelineConfig::load(config.as_deref())?;
            let (train_table, test_table) = ConcurrentReader::new()
                .read_train_test(&train, &test)
                .await?;

            let pipeline = WeatherPipeline::from_config(&config.alignment);
            let aligner = pipeline.aligner();
            let tables = [&train_table, &test_table];
            let outcome = aligner.compute_offsets(&tables);

            println!(
                "Site offsets (expected peak at hour {}, {:?} policy):",
                outcome.peak_hour, outcome.policy
            );
            for (site_id, offset) in &outcome.offsets {
                println!("  site {:>3}: {:+} h", site_id, offset);
            }
            if !outcome.undefined_sites.is_empty() {
                println!("  no air temperature readings: {:?}", outcome.undefined_sites);
            }

            if profile {
                println!("\nMean daily temperature rank by hour of day:");
                let header: Vec<String> = (0..HOURS_PER_DAY).map(|h| format!("{:>5}", h)).collect();
                println!("  site {}", header.join(""));
                for (site_id, hours) in aligner.hourly_rank_profile(&tables) {
                    let cells: Vec<String> = hours
                        .iter()
                        .map(|rank| match rank {
                            Some(rank) => format!("{:>5.1}", rank),
                            None => format!("{:>5}", "-"),
                        })
                        .collect();
                    println!("  {:>4} {}", site_id, cells.join(""));
                }
            }
        }

        Commands::Info { file } => {
            println!("Analyzing Parquet file: {}", file.display());

            let file_info = ParquetWriter::new().get_file_info(&file)?;
            println!("\n{}", file_info.summary());
        }
    }

    Ok(())
}

fn write_table(table: &CompactTable, path: &Path, output: &OutputConfig) -> Result<()> {
    info!("Writing {} to {}", table.name, path.display());
    match output.format {
        OutputFormat::Csv => CsvWriter::new().write_table(table, path),
        OutputFormat::Parquet => ParquetWriter::new()
            .with_compression(&output.compression)?
            .with_row_group_size(output.row_group_size)
            .write_table(table, path),
    }
}
