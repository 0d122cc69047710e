use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::f64::consts::PI;
use std::fs::File;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use weather_aligner::config::OutputFormat;
use weather_aligner::models::{
    header_row, NumericWidth, WeatherField, WeatherObservation, WeatherTable,
};
use weather_aligner::processors::{PipelineWarning, WeatherPipeline};
use weather_aligner::readers::{ConcurrentReader, WeatherReader};
use weather_aligner::utils::aligned_table_path;
use weather_aligner::writers::{CsvWriter, ParquetWriter};
use weather_aligner::Result;

fn start_of(year: i32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Hourly readings for each (site, peak hour) pair, with about 5% of the
/// non-temperature cells knocked out
fn synthetic_table(name: &str, start: NaiveDateTime, days: i64, sites: &[(u32, u32)]) -> WeatherTable {
    let mut rows = Vec::new();
    let mut cell = 0usize;

    for &(site_id, peak) in sites {
        for hour in 0..days * 24 {
            let timestamp = start + Duration::hours(hour);
            let phase = 2.0 * PI * ((hour % 24) as f64 - peak as f64) / 24.0;
            let air = 10.0 + 8.0 * phase.cos();

            let mut row = WeatherObservation::empty(site_id, timestamp)
                .with_field(WeatherField::AirTemperature, Some(air))
                .with_field(WeatherField::CloudCoverage, Some((hour % 9) as f64))
                .with_field(WeatherField::DewTemperature, Some(air - 5.5))
                .with_field(WeatherField::PrecipDepth1Hr, Some(if hour % 5 == 0 { -1.0 } else { 0.0 }))
                .with_field(WeatherField::SeaLevelPressure, Some(1010.0 + (hour % 12) as f64 * 0.7))
                .with_field(WeatherField::WindDirection, Some(((hour * 10) % 360) as f64))
                .with_field(WeatherField::WindSpeed, Some(1.5 + (hour % 4) as f64 * 0.5));

            for field in &WeatherField::ALL[1..] {
                cell += 1;
                if cell % 20 == 7 {
                    field.set(&mut row, None);
                }
            }
            rows.push(row);
        }
    }

    WeatherTable::new(name, rows)
}

fn write_csv(table: &WeatherTable) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{}", header_row().join(","))?;
    for row in &table.rows {
        let cells: Vec<String> = WeatherField::ALL
            .iter()
            .map(|f| f.get(row).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        writeln!(
            file,
            "{},{},{}",
            row.site_id,
            row.timestamp.format("%Y-%m-%d %H:%M:%S"),
            cells.join(",")
        )?;
    }
    file.flush()?;
    Ok(file)
}

#[test]
fn test_end_to_end_two_sites() {
    let train = synthetic_table("weather_train", start_of(2016), 3, &[(0, 10), (1, 16)]);
    let test = synthetic_table("weather_test", start_of(2017), 3, &[(0, 10), (1, 16)]);
    assert!(train.total_missing() > 0);
    let train_rows = train.len();

    let output = WeatherPipeline::new().run(train, test, None);

    let offsets = &output.report.alignment.offsets;
    assert_eq!(offsets.get(&0), Some(&-4));
    assert_eq!(offsets.get(&1), Some(&2));

    assert_eq!(output.train.num_rows(), train_rows);
    assert_eq!(output.train.total_missing(), 0);
    assert_eq!(output.test.total_missing(), 0);
    assert!(output.report.warnings.is_empty());

    for compaction in &output.report.compaction {
        assert!(compaction.bytes_after <= compaction.bytes_before);
    }

    // site 0 peaked 4 hours early, so its readings move 4 hours later
    let timestamps = output.train.timestamps().unwrap();
    assert_eq!(timestamps[0], start_of(2016) + Duration::hours(4));
    assert_eq!(timestamps[72], start_of(2016) - Duration::hours(2));

    let site_id = output.train.column("site_id").unwrap();
    assert_eq!(site_id.data.width(), Some(NumericWidth::Int8));
}

#[test]
fn test_second_run_finds_no_skew() {
    let train = synthetic_table("weather_train", start_of(2016), 3, &[(0, 10), (1, 16)]);
    let test = synthetic_table("weather_test", start_of(2017), 3, &[(0, 10), (1, 16)]);
    let output = WeatherPipeline::new().run(train, test, None);

    let decode = |table: &weather_aligner::models::CompactTable| -> WeatherTable {
        let mut buffer = Vec::new();
        CsvWriter::new().write_to(table, &mut buffer).unwrap();
        WeatherReader::new()
            .read_from(buffer.as_slice(), &table.name)
            .unwrap()
    };
    let train = decode(&output.train);
    let test = decode(&output.test);

    let rerun = WeatherPipeline::new().run(train, test, None);
    assert!(rerun.report.alignment.offsets.values().all(|&o| o == 0));
}

#[test]
fn test_site_without_temperature_is_reported() {
    let mut train = synthetic_table("weather_train", start_of(2016), 1, &[(0, 14), (5, 14)]);
    for row in train.rows.iter_mut().filter(|r| r.site_id == 5) {
        row.air_temperature = None;
    }
    let test = synthetic_table("weather_test", start_of(2017), 1, &[(0, 14)]);

    let output = WeatherPipeline::new().run(train, test, None);

    assert_eq!(output.report.alignment.undefined_sites, vec![5]);
    assert!(output
        .report
        .warnings
        .contains(&PipelineWarning::AlignmentUndefined { site_ids: vec![5] }));
    assert!(output.report.warnings.iter().any(|w| matches!(
        w,
        PipelineWarning::AllMissingColumn {
            site_id: 5,
            column: WeatherField::AirTemperature,
            ..
        }
    )));
}

#[tokio::test]
async fn test_files_to_parquet() -> Result<()> {
    let train = synthetic_table("weather_train", start_of(2016), 2, &[(3, 15)]);
    let test = synthetic_table("weather_test", start_of(2017), 2, &[(3, 15)]);
    let train_file = write_csv(&train)?;
    let test_file = write_csv(&test)?;

    let (train, test) = ConcurrentReader::new()
        .read_train_test(train_file.path(), test_file.path())
        .await?;
    assert_eq!(train.len(), 48);

    let output = WeatherPipeline::new().run(train, test, None);
    assert_eq!(output.report.alignment.offsets.get(&3), Some(&1));

    let dir = TempDir::new()?;
    let path = aligned_table_path(dir.path(), &output.train.name, OutputFormat::Parquet);
    let writer = ParquetWriter::new().with_compression("snappy")?;
    writer.write_table(&output.train, &path)?;

    let info = writer.get_file_info(&path)?;
    assert_eq!(info.total_rows, 48);
    assert_eq!(info.column_type("site_id"), Some(&arrow::datatypes::DataType::Int8));
    assert!(path.ends_with("weather_train_aligned.parquet"));
    Ok(())
}

#[test]
fn test_csv_output_round_trips_through_reader() -> Result<()> {
    let train = synthetic_table("weather_train", start_of(2016), 2, &[(0, 14)]);
    let test = synthetic_table("weather_test", start_of(2017), 1, &[(0, 14)]);
    let output = WeatherPipeline::new().run(train, test, None);

    let dir = TempDir::new()?;
    let path = aligned_table_path(dir.path(), &output.test.name, OutputFormat::Csv);
    CsvWriter::new().write_table(&output.test, &path)?;

    let table = WeatherReader::new().read_from(File::open(&path)?, "weather_test")?;
    assert_eq!(table.len(), 24);
    assert_eq!(table.total_missing(), 0);
    Ok(())
}
