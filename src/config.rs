//! City catalogue and runtime settings.

use std::path::{Path, PathBuf};

/// One of the cities with a bundled trip file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Canonical lowercase key, e.g. `"new york city"`.
    pub fn name(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new york city",
            City::Washington => "washington",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        }
    }

    /// File name of the city's trip data, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

const DEFAULT_LOG_FILE: &str = "logs/bikeshare_stats.log";

/// Settings resolved from CLI flags, the environment and `.env`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_file_path: PathBuf,
}

impl AppConfig {
    /// Builds the config, letting an explicit `data_dir` win over
    /// `BIKESHARE_DATA_DIR`.
    pub fn from_env(data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir
            .or_else(|| std::env::var_os("BIKESHARE_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));
        let log_file_path = std::env::var_os("LOG_FILE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Self {
            data_dir,
            log_file_path,
        }
    }

    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }

    /// Full path of the CSV file for `city`.
    pub fn city_path(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }
}
