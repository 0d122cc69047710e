use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::WeatherField;

/// One hourly weather reading for a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WeatherObservation {
    pub site_id: u32,

    #[serde(with = "crate::utils::timestamp_format")]
    pub timestamp: NaiveDateTime,

    #[validate(range(min = -90.0, max = 60.0))]
    pub air_temperature: Option<f64>,

    // Oktas
    #[validate(range(min = 0.0, max = 9.0))]
    pub cloud_coverage: Option<f64>,

    #[validate(range(min = -90.0, max = 60.0))]
    pub dew_temperature: Option<f64>,

    pub precip_depth_1_hr: Option<f64>,

    pub sea_level_pressure: Option<f64>,

    #[validate(range(min = 0.0, max = 360.0))]
    pub wind_direction: Option<f64>,

    #[validate(range(min = 0.0))]
    pub wind_speed: Option<f64>,
}

impl WeatherObservation {
    /// Observation with every weather field missing
    pub fn empty(site_id: u32, timestamp: NaiveDateTime) -> Self {
        Self {
            site_id,
            timestamp,
            air_temperature: None,
            cloud_coverage: None,
            dew_temperature: None,
            precip_depth_1_hr: None,
            sea_level_pressure: None,
            wind_direction: None,
            wind_speed: None,
        }
    }

    pub fn with_field(mut self, field: WeatherField, value: Option<f64>) -> Self {
        field.set(&mut self, value);
        self
    }

    pub fn missing_fields(&self) -> usize {
        WeatherField::ALL
            .iter()
            .filter(|f| f.get(self).is_none())
            .count()
    }

    /// Same observation moved `hours` later (negative moves it earlier)
    pub fn shifted(mut self, hours: i64) -> Self {
        self.timestamp += Duration::hours(hours);
        self
    }
}
