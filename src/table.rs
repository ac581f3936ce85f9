//! Loading a city's trip file into a filtered [`TripTable`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Weekday};
use csv::StringRecord;
use tracing::{debug, info};

use crate::error::BikeshareError;
use crate::filters::Filters;

pub const START_TIME: &str = "Start Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const TRIP_DURATION: &str = "Trip Duration";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

/// Timestamp layouts accepted for the start time column.
static TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// One trip. `month` and `day_of_week` are derived from `start_time` at load
/// time and never change afterwards.
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub trip_duration: f64,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<f64>,
    pub month: u32,
    pub day_of_week: Weekday,
    /// The row as read from the file, for display.
    pub raw: StringRecord,
}

/// Trips of one city after filtering, in file order.
#[derive(Debug, Clone)]
pub struct TripTable {
    headers: StringRecord,
    rows: Vec<TripRecord>,
    has_gender: bool,
    has_birth_year: bool,
    integer_durations: bool,
}

impl TripTable {
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[TripRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_gender(&self) -> bool {
        self.has_gender
    }

    pub fn has_birth_year(&self) -> bool {
        self.has_birth_year
    }

    /// True when every trip duration in the file is a whole-number literal,
    /// so totals print without a fractional part.
    pub fn integer_durations(&self) -> bool {
        self.integer_durations
    }

    /// Keeps only the rows matching the month and weekday filters.
    pub fn filtered(mut self, filters: &Filters) -> Self {
        self.rows
            .retain(|row| filters.month.matches(row.month) && filters.day.matches(row.day_of_week));
        self
    }
}

/// Positions of the known columns within the header row.
struct Columns {
    start_time: usize,
    start_station: usize,
    end_station: usize,
    trip_duration: usize,
    user_type: usize,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord, path: &Path) -> Result<Self, BikeshareError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| BikeshareError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
        };

        Ok(Columns {
            start_time: require(START_TIME)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            trip_duration: require(TRIP_DURATION)?,
            user_type: require(USER_TYPE)?,
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number(row: usize, column: &str, value: &str) -> Result<f64, BikeshareError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| BikeshareError::InvalidNumber {
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
}

fn parse_record(
    row: usize,
    record: StringRecord,
    columns: &Columns,
) -> Result<TripRecord, BikeshareError> {
    let field = |idx: usize| record.get(idx).unwrap_or_default();

    let start_time =
        parse_timestamp(field(columns.start_time)).ok_or_else(|| BikeshareError::InvalidTimestamp {
            row,
            value: field(columns.start_time).to_string(),
        })?;
    let trip_duration = parse_number(row, TRIP_DURATION, field(columns.trip_duration))?;

    let birth_year = match columns.birth_year.map(field) {
        Some(value) if !value.trim().is_empty() => Some(parse_number(row, BIRTH_YEAR, value)?),
        _ => None,
    };

    Ok(TripRecord {
        month: start_time.month(),
        day_of_week: start_time.weekday(),
        start_time,
        start_station: optional_text(field(columns.start_station)),
        end_station: optional_text(field(columns.end_station)),
        trip_duration,
        user_type: optional_text(field(columns.user_type)),
        gender: columns.gender.map(field).and_then(optional_text),
        birth_year,
        raw: record,
    })
}

/// Reads every trip from a CSV source without filtering.
pub fn read_trips<R: Read>(reader: R, path: &Path) -> Result<TripTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();
    let columns = Columns::locate(&headers, path)?;

    let mut rows = Vec::new();
    let mut integer_durations = true;
    for (idx, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Malformed CSV in {} at row {}", path.display(), idx + 1))?;
        integer_durations &= record
            .get(columns.trip_duration)
            .is_some_and(|v| v.trim().parse::<i64>().is_ok());
        rows.push(parse_record(idx + 1, record, &columns)?);
    }

    Ok(TripTable {
        headers,
        rows,
        has_gender: columns.gender.is_some(),
        has_birth_year: columns.birth_year.is_some(),
        integer_durations,
    })
}

/// Loads the trip file at `path` and applies the month and weekday filters.
///
/// # Errors
///
/// Fails if the file cannot be opened, is not valid CSV, lacks a required
/// column, or holds a start time or number that cannot be parsed.
#[tracing::instrument(skip(path, filters), fields(path = %path.display()))]
pub fn load_data(path: &Path, filters: &Filters) -> Result<TripTable> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let table = read_trips(file, path)?;
    let raw_rows = table.len();
    debug!(
        raw_rows,
        has_gender = table.has_gender,
        has_birth_year = table.has_birth_year,
        "Trip file parsed"
    );

    let table = table.filtered(filters);
    info!(
        raw_rows,
        filtered_rows = table.len(),
        month = filters.month.title(),
        day = filters.day.title(),
        "Trip data loaded"
    );
    Ok(table)
}
