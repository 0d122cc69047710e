use crate::error::Result;
use crate::models::WeatherTable;
use crate::readers::WeatherReader;
use crate::utils::constants::{TEST_TABLE, TRAIN_TABLE};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::info;

/// Reads the train and test weather files side by side
pub struct ConcurrentReader;

impl ConcurrentReader {
    pub fn new() -> Self {
        Self
    }

    pub async fn read_train_test(
        &self,
        train_path: &Path,
        test_path: &Path,
    ) -> Result<(WeatherTable, WeatherTable)> {
        let train_handle = Self::spawn_read(train_path.to_path_buf(), TRAIN_TABLE);
        let test_handle = Self::spawn_read(test_path.to_path_buf(), TEST_TABLE);

        let (train, test) = tokio::try_join!(train_handle, test_handle)?;
        let (train, test) = (train?, test?);

        info!(
            "Loaded {} train rows and {} test rows",
            train.len(),
            test.len()
        );
        Ok((train, test))
    }

    fn spawn_read(path: PathBuf, name: &'static str) -> JoinHandle<Result<WeatherTable>> {
        tokio::task::spawn_blocking(move || WeatherReader::new().read_table(&path, name))
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new()
    }
}
