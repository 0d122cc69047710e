use crate::error::{ProcessingError, Result};
use crate::models::{header_row, WeatherField, WeatherObservation, WeatherTable};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use validator::Validate;

pub struct WeatherReader;

impl WeatherReader {
    pub fn new() -> Self {
        Self
    }

    /// Read a weather CSV file into a table named `name`
    pub fn read_table(&self, path: &Path, name: &str) -> Result<WeatherTable> {
        debug!("Reading {} from {}", name, path.display());
        let file = File::open(path)?;
        self.read_from(file, name)
    }

    /// Read weather rows from any CSV source with a header row
    pub fn read_from<R: Read>(&self, source: R, name: &str) -> Result<WeatherTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .buffer_capacity(DEFAULT_BUFFER_SIZE)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = header_row()
            .into_iter()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(ProcessingError::InvalidFormat(format!(
                "{} is missing columns: {}",
                name,
                missing.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for result in reader.deserialize::<WeatherObservation>() {
            let mut row: WeatherObservation = result?;
            // A literal "NaN" cell is a missing reading
            for field in WeatherField::ALL {
                if field.get(&row).is_some_and(f64::is_nan) {
                    field.set(&mut row, None);
                }
            }
            rows.push(row);
        }

        let suspect_rows = implausible_rows(&rows);

        if suspect_rows > 0 {
            warn!(
                "{}: {} rows hold physically implausible readings",
                name, suspect_rows
            );
        }
        debug!("Read {} rows into {}", rows.len(), name);

        Ok(WeatherTable::new(name, rows))
    }
}

/// Rows with a reading outside its physical range; they are kept as read
fn implausible_rows(rows: &[WeatherObservation]) -> usize {
    rows.iter().filter(|row| row.validate().is_err()).count()
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}
