use serde::{Deserialize, Serialize};

use crate::models::WeatherObservation;

/// How a column is stored and compacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Integer,
    Float,
    NonNumeric,
}

/// Numeric weather readings carried by every observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeatherField {
    AirTemperature,
    CloudCoverage,
    DewTemperature,
    PrecipDepth1Hr,
    SeaLevelPressure,
    WindDirection,
    WindSpeed,
}

impl WeatherField {
    pub const ALL: [WeatherField; 7] = [
        WeatherField::AirTemperature,
        WeatherField::CloudCoverage,
        WeatherField::DewTemperature,
        WeatherField::PrecipDepth1Hr,
        WeatherField::SeaLevelPressure,
        WeatherField::WindDirection,
        WeatherField::WindSpeed,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            WeatherField::AirTemperature => "air_temperature",
            WeatherField::CloudCoverage => "cloud_coverage",
            WeatherField::DewTemperature => "dew_temperature",
            WeatherField::PrecipDepth1Hr => "precip_depth_1_hr",
            WeatherField::SeaLevelPressure => "sea_level_pressure",
            WeatherField::WindDirection => "wind_direction",
            WeatherField::WindSpeed => "wind_speed",
        }
    }

    pub fn get(&self, observation: &WeatherObservation) -> Option<f64> {
        match self {
            WeatherField::AirTemperature => observation.air_temperature,
            WeatherField::CloudCoverage => observation.cloud_coverage,
            WeatherField::DewTemperature => observation.dew_temperature,
            WeatherField::PrecipDepth1Hr => observation.precip_depth_1_hr,
            WeatherField::SeaLevelPressure => observation.sea_level_pressure,
            WeatherField::WindDirection => observation.wind_direction,
            WeatherField::WindSpeed => observation.wind_speed,
        }
    }

    pub fn set(&self, observation: &mut WeatherObservation, value: Option<f64>) {
        let slot = match self {
            WeatherField::AirTemperature => &mut observation.air_temperature,
            WeatherField::CloudCoverage => &mut observation.cloud_coverage,
            WeatherField::DewTemperature => &mut observation.dew_temperature,
            WeatherField::PrecipDepth1Hr => &mut observation.precip_depth_1_hr,
            WeatherField::SeaLevelPressure => &mut observation.sea_level_pressure,
            WeatherField::WindDirection => &mut observation.wind_direction,
            WeatherField::WindSpeed => &mut observation.wind_speed,
        };
        *slot = value;
    }
}

impl std::fmt::Display for WeatherField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// A column of the weather table schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherColumn {
    SiteId,
    Timestamp,
    Field(WeatherField),
}

impl WeatherColumn {
    pub fn name(&self) -> &'static str {
        match self {
            WeatherColumn::SiteId => "site_id",
            WeatherColumn::Timestamp => "timestamp",
            WeatherColumn::Field(field) => field.column_name(),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            WeatherColumn::SiteId => ColumnKind::Integer,
            WeatherColumn::Timestamp => ColumnKind::NonNumeric,
            WeatherColumn::Field(_) => ColumnKind::Float,
        }
    }
}

/// Fixed column layout of the weather tables, in file order.
pub const WEATHER_COLUMNS: [WeatherColumn; 9] = [
    WeatherColumn::SiteId,
    WeatherColumn::Timestamp,
    WeatherColumn::Field(WeatherField::AirTemperature),
    WeatherColumn::Field(WeatherField::CloudCoverage),
    WeatherColumn::Field(WeatherField::DewTemperature),
    WeatherColumn::Field(WeatherField::PrecipDepth1Hr),
    WeatherColumn::Field(WeatherField::SeaLevelPressure),
    WeatherColumn::Field(WeatherField::WindDirection),
    WeatherColumn::Field(WeatherField::WindSpeed),
];

pub fn header_row() -> Vec<&'static str> {
    WEATHER_COLUMNS.iter().map(|c| c.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_classification() {
        assert_eq!(WEATHER_COLUMNS[0].kind(), ColumnKind::Integer);
        assert_eq!(WEATHER_COLUMNS[1].kind(), ColumnKind::NonNumeric);
        assert!(WEATHER_COLUMNS[2..]
            .iter()
            .all(|c| c.kind() == ColumnKind::Float));
        assert_eq!(header_row()[5], "precip_depth_1_hr");
    }
}
