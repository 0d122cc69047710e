use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weather_aligner::models::{WeatherField, WeatherObservation, WeatherTable};
use weather_aligner::processors::gap_filler::interpolate_linear;
use weather_aligner::processors::{Compactor, GapFiller, TimestampAligner, WeatherPipeline};

// Hourly readings with a daily temperature cycle and every 13th cell missing
fn create_weather_table(name: &str, year: i32, site_count: u32, days: i64) -> WeatherTable {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut rows = Vec::with_capacity(site_count as usize * days as usize * 24);
    let mut cell = 0usize;

    for site_id in 0..site_count {
        let peak = (10 + site_id % 8) as f64;
        for hour in 0..days * 24 {
            let phase = 2.0 * std::f64::consts::PI * ((hour % 24) as f64 - peak) / 24.0;
            let air = 12.0 + 7.0 * phase.cos();
            let mut row = WeatherObservation::empty(site_id, start + Duration::hours(hour))
                .with_field(WeatherField::AirTemperature, Some(air))
                .with_field(WeatherField::CloudCoverage, Some((hour % 9) as f64))
                .with_field(WeatherField::DewTemperature, Some(air - 4.0))
                .with_field(WeatherField::PrecipDepth1Hr, Some(0.0))
                .with_field(WeatherField::SeaLevelPressure, Some(1012.0 + (hour % 7) as f64))
                .with_field(WeatherField::WindDirection, Some(((hour * 20) % 360) as f64))
                .with_field(WeatherField::WindSpeed, Some((hour % 6) as f64 * 0.8));

            for field in WeatherField::ALL {
                cell += 1;
                if cell % 13 == 0 {
                    field.set(&mut row, None);
                }
            }
            rows.push(row);
        }
    }

    WeatherTable::new(name, rows)
}

fn benchmark_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("timestamp_offsets");

    for site_count in [4, 16, 64].iter() {
        let train = create_weather_table("weather_train", 2016, *site_count, 30);
        let test = create_weather_table("weather_test", 2017, *site_count, 30);
        let aligner = TimestampAligner::new();

        group.bench_with_input(
            BenchmarkId::new("compute_offsets", site_count),
            site_count,
            |b, _| b.iter(|| aligner.compute_offsets(black_box(&[&train, &test]))),
        );
    }

    group.finish();
}

fn benchmark_gap_filling(c: &mut Criterion) {
    let table = create_weather_table("weather_train", 2016, 16, 30);
    let filler = GapFiller::new();

    c.bench_function("fill_16_sites_30_days", |b| {
        b.iter(|| filler.fill(black_box(table.clone())))
    });

    c.bench_function("interpolate_linear", |b| {
        let values: Vec<Option<f64>> = (0..10_000)
            .map(|i| if i % 7 == 0 { None } else { Some(i as f64) })
            .collect();
        b.iter(|| {
            let mut column = values.clone();
            interpolate_linear(black_box(&mut column))
        })
    });
}

fn benchmark_compaction(c: &mut Criterion) {
    let table = GapFiller::new()
        .fill(create_weather_table("weather_train", 2016, 16, 30))
        .0;
    let compactor = Compactor::new();

    c.bench_function("compact_16_sites_30_days", |b| {
        b.iter(|| compactor.compact(black_box(table.clone())))
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(20);

    for days in [7, 30].iter() {
        let train = create_weather_table("weather_train", 2016, 16, *days);
        let test = create_weather_table("weather_test", 2017, 16, *days);
        let pipeline = WeatherPipeline::new();

        group.bench_with_input(BenchmarkId::new("run", days), days, |b, _| {
            b.iter(|| pipeline.run(black_box(train.clone()), black_box(test.clone()), None))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_offsets,
    benchmark_gap_filling,
    benchmark_compaction,
    benchmark_pipeline
);
criterion_main!(benches);
