//! Descriptive statistics over a filtered [`TripTable`].
//!
//! Every report is a read-only pass over the rows. A "mode" is the most
//! frequent value together with its count; when several values share the top
//! count the smallest one wins, so repeated runs over the same rows always
//! agree.

use std::collections::BTreeMap;

use chrono::Timelike;
use serde::Serialize;
use tracing::debug;

use crate::error::BikeshareError;
use crate::filters::{Filters, weekday_name};
use crate::table::{BIRTH_YEAR, END_STATION, START_STATION, TRIP_DURATION, TripTable, USER_TYPE};

/// A value and how many rows carry it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counted<T> {
    pub value: T,
    pub count: usize,
}

/// One entry of a value-count breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub value: String,
    pub count: usize,
    /// Fraction (0.0-1.0) of all non-missing values.
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    /// Only computed when the data is not filtered by month.
    pub month: Option<Counted<u32>>,
    /// Only computed when the data is not filtered by weekday.
    pub weekday: Option<Counted<String>>,
    pub hour: Counted<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationStats {
    pub start_station: Counted<String>,
    pub end_station: Counted<String>,
    /// Combined `"<start> to <end>"` trip.
    pub trip: Counted<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub mean_seconds: f64,
    /// Whether the source column holds whole numbers only.
    pub integer_total: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthYears {
    pub earliest: i64,
    pub most_recent: i64,
    pub most_common: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<Share>,
    /// `None` when the city file has no gender column.
    pub genders: Option<Vec<Share>>,
    /// `None` when the city file has no birth year column.
    pub birth_years: Option<BirthYears>,
}

/// Most frequent value of `values`, ties going to the smallest value.
///
/// # Errors
///
/// Returns [`BikeshareError::EmptySeries`] when `values` is empty.
pub fn mode<T, I>(column: &str, values: I) -> Result<Counted<T>, BikeshareError>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }

    best.map(|(value, count)| Counted { value, count })
        .ok_or_else(|| BikeshareError::EmptySeries {
            column: column.to_string(),
        })
}

/// Count and share of every distinct value, most frequent first.
/// Equal counts are ordered by value.
pub fn value_counts<'a, I>(values: I) -> Vec<Share>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let total: usize = counts.values().sum();
    let mut shares: Vec<Share> = counts
        .into_iter()
        .map(|(value, count)| Share {
            value: value.to_string(),
            count,
            fraction: count as f64 / total as f64,
        })
        .collect();
    // stable sort keeps the alphabetical order among ties
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

/// Most common month, weekday and start hour.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn time_stats(table: &TripTable, filters: &Filters) -> Result<TimeStats, BikeshareError> {
    let rows = table.rows();

    let month = if filters.month.is_all() {
        Some(mode("month", rows.iter().map(|r| r.month))?)
    } else {
        None
    };

    let weekday = if filters.day.is_all() {
        let top = mode("day_of_week", rows.iter().map(|r| weekday_name(r.day_of_week)))?;
        Some(Counted {
            value: top.value.to_string(),
            count: top.count,
        })
    } else {
        None
    };

    let hour = mode("hour", rows.iter().map(|r| r.start_time.hour()))?;

    debug!(?month, ?weekday, ?hour, "Time stats computed");
    Ok(TimeStats {
        month,
        weekday,
        hour,
    })
}

/// Most popular start station, end station and trip.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn station_stats(table: &TripTable) -> Result<StationStats, BikeshareError> {
    let rows = table.rows();

    let start_station = mode(
        START_STATION,
        rows.iter().filter_map(|r| r.start_station.as_deref()),
    )?;
    let end_station = mode(
        END_STATION,
        rows.iter().filter_map(|r| r.end_station.as_deref()),
    )?;
    // a trip needs both ends
    let trip = mode(
        "Start End Station",
        rows.iter().filter_map(|r| match (&r.start_station, &r.end_station) {
            (Some(start), Some(end)) => Some(format!("{start} to {end}")),
            _ => None,
        }),
    )?;

    Ok(StationStats {
        start_station: Counted {
            value: start_station.value.to_string(),
            count: start_station.count,
        },
        end_station: Counted {
            value: end_station.value.to_string(),
            count: end_station.count,
        },
        trip,
    })
}

/// Total and mean trip duration in seconds.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn duration_stats(table: &TripTable) -> Result<DurationStats, BikeshareError> {
    if table.is_empty() {
        return Err(BikeshareError::EmptySeries {
            column: TRIP_DURATION.to_string(),
        });
    }

    let total_seconds: f64 = table.rows().iter().map(|r| r.trip_duration).sum();
    let mean_seconds = total_seconds / table.len() as f64;

    Ok(DurationStats {
        total_seconds,
        mean_seconds,
        integer_total: table.integer_durations(),
    })
}

/// User type, gender and birth year breakdowns.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn user_stats(table: &TripTable) -> Result<UserStats, BikeshareError> {
    let rows = table.rows();

    let user_types = value_counts(rows.iter().filter_map(|r| r.user_type.as_deref()));

    let genders = table
        .has_gender()
        .then(|| value_counts(rows.iter().filter_map(|r| r.gender.as_deref())));

    let birth_years = if table.has_birth_year() {
        let years: Vec<i64> = rows
            .iter()
            .filter_map(|r| r.birth_year)
            .map(|y| y.trunc() as i64)
            .collect();
        let (Some(&earliest), Some(&most_recent)) = (years.iter().min(), years.iter().max())
        else {
            return Err(BikeshareError::EmptySeries {
                column: BIRTH_YEAR.to_string(),
            });
        };
        Some(BirthYears {
            earliest,
            most_recent,
            most_common: mode(BIRTH_YEAR, years.iter().copied())?.value,
        })
    } else {
        None
    };

    if user_types.is_empty() {
        debug!(column = USER_TYPE, "No user type values in selection");
    }

    Ok(UserStats {
        user_types,
        genders,
        birth_years,
    })
}
