/// Hour of day at which outdoor air temperature is assumed to peak
pub const DEFAULT_PEAK_HOUR: u32 = 14;
pub const HOURS_PER_DAY: usize = 24;

/// Timestamp layout of the weather CSV files
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Table names
pub const TRAIN_TABLE: &str = "weather_train";
pub const TEST_TABLE: &str = "weather_test";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "WEATHER_ALIGNER";

/// Output formats
pub const FORMAT_CSV: &str = "csv";
pub const FORMAT_PARQUET: &str = "parquet";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
