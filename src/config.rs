use crate::error::Result;
use crate::processors::OffsetPolicy;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_PEAK_HOUR, DEFAULT_ROW_GROUP_SIZE, ENV_PREFIX, FORMAT_CSV,
    FORMAT_PARQUET,
};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct PipelineConfig {
    #[serde(default)]
    #[validate(nested)]
    pub alignment: AlignmentConfig,

    #[serde(default)]
    #[validate(nested)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AlignmentConfig {
    /// Local hour at which air temperature is expected to peak
    #[serde(default = "default_peak_hour")]
    #[validate(range(max = 23))]
    pub peak_hour: u32,

    #[serde(default)]
    pub offset_policy: OffsetPolicy,
}

fn default_peak_hour() -> u32 {
    DEFAULT_PEAK_HOUR
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            peak_hour: DEFAULT_PEAK_HOUR,
            offset_policy: OffsetPolicy::Literal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => FORMAT_CSV,
            OutputFormat::Parquet => FORMAT_PARQUET,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_compression")]
    #[validate(length(min = 1))]
    pub compression: String,

    #[serde(default = "default_row_group_size")]
    #[validate(range(min = 1))]
    pub row_group_size: usize,
}

fn default_compression() -> String {
    COMPRESSION_SNAPPY.to_string()
}

fn default_row_group_size() -> usize {
    DEFAULT_ROW_GROUP_SIZE
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            compression: default_compression(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

impl PipelineConfig {
    /// Built-in defaults, overridden by an optional file, overridden by
    /// `WEATHER_ALIGNER__SECTION__KEY` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config: PipelineConfig = builder
            .add_source(
                Environment::with_prefix(env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.alignment.peak_hour, 14);
        assert_eq!(config.alignment.offset_policy, OffsetPolicy::Literal);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_load_from_toml_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[alignment]")?;
        writeln!(file, "peak_hour = 15")?;
        writeln!(file, "offset_policy = \"circular\"")?;
        writeln!(file, "[output]")?;
        writeln!(file, "format = \"parquet\"")?;
        file.flush()?;

        let config = PipelineConfig::load(Some(file.path()))?;

        assert_eq!(config.alignment.peak_hour, 15);
        assert_eq!(config.alignment.offset_policy, OffsetPolicy::Circular);
        assert_eq!(config.output.format, OutputFormat::Parquet);
        assert_eq!(config.output.compression, "snappy");
        assert_eq!(config.output.row_group_size, 10000);
        Ok(())
    }

    #[test]
    fn test_environment_overrides_file() -> Result<()> {
        // Own prefix so the other tests never see these variables
        let prefix = "WEATHER_ALIGNER_ENV_TEST";
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[output]")?;
        writeln!(file, "row_group_size = 2000")?;
        file.flush()?;

        std::env::set_var("WEATHER_ALIGNER_ENV_TEST__OUTPUT__ROW_GROUP_SIZE", "500");
        std::env::set_var("WEATHER_ALIGNER_ENV_TEST__ALIGNMENT__PEAK_HOUR", "13");
        let loaded = PipelineConfig::load_with_prefix(Some(file.path()), prefix);
        std::env::remove_var("WEATHER_ALIGNER_ENV_TEST__OUTPUT__ROW_GROUP_SIZE");
        std::env::remove_var("WEATHER_ALIGNER_ENV_TEST__ALIGNMENT__PEAK_HOUR");

        let config = loaded?;
        assert_eq!(config.output.row_group_size, 500);
        assert_eq!(config.alignment.peak_hour, 13);
        assert_eq!(config.output.compression, "snappy");
        Ok(())
    }

    #[test]
    fn test_out_of_range_peak_hour_is_rejected() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[alignment]")?;
        writeln!(file, "peak_hour = 30")?;
        file.flush()?;

        assert!(PipelineConfig::load(Some(file.path())).is_err());
        Ok(())
    }
}
