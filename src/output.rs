//! Text rendering of the reports and of raw trip rows.
//!
//! Every line carries the active month and weekday selection so that a
//! report read out of context still says what it covers.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::filters::{Filters, SEPARATOR, weekday_name};
use crate::stats::{DurationStats, Share, StationStats, TimeStats, UserStats};
use crate::table::{TripRecord, TripTable};

pub const TIME_HEADING: &str = "Calculating The Most Frequent Times of Travel...";
pub const STATION_HEADING: &str = "Calculating The Most Popular Stations and Trip...";
pub const DURATION_HEADING: &str = "Calculating Trip Duration...";
pub const USER_HEADING: &str = "Calculating User Stats...";

/// Renders whole seconds as `H:MM:SS`, with a leading day count once the
/// value reaches a full day (`1 day, 0:00:00`, `2 days, 3:04:05`).
pub fn format_hms(seconds: f64) -> String {
    let total = seconds.trunc().max(0.0) as u64;
    let days = total / 86_400;
    let rest = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Totals of a whole-number column print as integers; totals of a
/// fractional column always keep a decimal point (`600.0`).
pub fn format_seconds(seconds: f64, integer_total: bool) -> String {
    if integer_total && seconds.fract() == 0.0 && seconds.abs() < 1e15 {
        format!("{}", seconds as i64)
    } else {
        format!("{seconds:?}")
    }
}

pub fn render_time_stats(stats: &TimeStats, filters: &Filters) -> String {
    let month = filters.month.title();
    let day = filters.day.title();
    let mut lines = Vec::new();

    if let Some(top) = &stats.month {
        lines.push(format!(
            "Most common month: {}, count: {}, for weekday: {day}",
            top.value, top.count
        ));
    }
    if let Some(top) = &stats.weekday {
        lines.push(format!(
            "Most common day of week: {}, count: {}, for month: {month}",
            top.value, top.count
        ));
    }
    lines.push(format!(
        "Most common start hour: {}, count: {}, for month: {month} and weekday: {day}",
        stats.hour.value, stats.hour.count
    ));

    lines.join("\n")
}

pub fn render_station_stats(stats: &StationStats, filters: &Filters) -> String {
    let scope = scope(filters);
    [
        format!(
            "Most common start station: {}, count: {}, {scope}",
            stats.start_station.value, stats.start_station.count
        ),
        format!(
            "Most common end station: {}, count: {}, {scope}",
            stats.end_station.value, stats.end_station.count
        ),
        format!(
            "Most common trip: {}, count: {}, {scope}",
            stats.trip.value, stats.trip.count
        ),
    ]
    .join("\n")
}

pub fn render_duration_stats(stats: &DurationStats, filters: &Filters) -> String {
    let scope = scope(filters);
    format!(
        "Total travel time: {} seconds or {}, {scope}\n\
         Mean travel time: {:.0} seconds or {}, {scope}",
        format_seconds(stats.total_seconds, stats.integer_total),
        format_hms(stats.total_seconds),
        stats.mean_seconds,
        format_hms(stats.mean_seconds),
    )
}

fn render_shares(shares: &[Share]) -> String {
    shares
        .iter()
        .map(|s| format!("\n{}: {} or {:.1}%, ", s.value, s.count, s.fraction * 100.0))
        .collect()
}

pub fn render_user_stats(stats: &UserStats, filters: &Filters) -> String {
    let month = filters.month.title();
    let day = filters.day.title();
    let mut text = format!(
        "User counts: {}\nfor month: {month} and weekday: {day}",
        render_shares(&stats.user_types)
    );

    match &stats.genders {
        Some(genders) => text.push_str(&format!(
            "\n\nUser genders: {}\nfor month: {month} and weekday: {day}",
            render_shares(genders)
        )),
        None => text.push_str("\n\nNo gender data of users."),
    }

    match &stats.birth_years {
        Some(years) => text.push_str(&format!(
            "\n\nUser year of birth: Earliest: {}, most recent: {}, most common: {}, {}",
            years.earliest,
            years.most_recent,
            years.most_common,
            scope(filters)
        )),
        None => text.push_str("\n\nNo year of birth data of users."),
    }

    text
}

fn scope(filters: &Filters) -> String {
    format!(
        "for month: {} and weekday: {}",
        filters.month.title(),
        filters.day.title()
    )
}

/// Writes a report between its heading and the timing footer.
pub fn write_section<W: Write>(
    out: &mut W,
    heading: &str,
    body: &str,
    elapsed: Duration,
) -> Result<()> {
    writeln!(out, "\n{heading}\n")?;
    writeln!(out, "{body}")?;
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}

/// One `column: value` line per original CSV column, then the derived
/// month and weekday.
pub fn render_row(headers: &csv::StringRecord, row: &TripRecord) -> String {
    let mut lines: Vec<String> = headers
        .iter()
        .zip(row.raw.iter())
        .map(|(header, value)| {
            let header = if header.trim().is_empty() {
                "index"
            } else {
                header
            };
            format!("{header}: {value}")
        })
        .collect();
    lines.push(format!("month: {}", row.month));
    lines.push(format!("day_of_week: {}", weekday_name(row.day_of_week)));
    lines.join("\n")
}

pub fn write_rows<W: Write>(out: &mut W, table: &TripTable, rows: &[TripRecord]) -> Result<()> {
    for row in rows {
        writeln!(out, "{}\n", render_row(table.headers(), row))?;
    }
    Ok(())
}

/// Writes any report as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, report: &impl Serialize) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::City;
    use crate::filters::{DayFilter, MonthFilter};
    use crate::stats::{BirthYears, Counted};
    use crate::table::tests::sample_table;
    use chrono::{Month, Weekday};

    fn january_mondays() -> Filters {
        Filters {
            city: City::Chicago,
            month: MonthFilter::Only(Month::January),
            day: DayFilter::Only(Weekday::Mon),
        }
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0.0), "0:00:00");
        assert_eq!(format_hms(60.0), "0:01:00");
        assert_eq!(format_hms(1071.43), "0:17:51");
        assert_eq!(format_hms(86_400.0), "1 day, 0:00:00");
        assert_eq!(format_hms(2.0 * 86_400.0 + 3.0 * 3600.0 + 4.0 * 60.0 + 5.0), "2 days, 3:04:05");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(60.0, true), "60");
        assert_eq!(format_seconds(60.0, false), "60.0");
        assert_eq!(format_seconds(1528.866, false), "1528.866");
    }

    #[test]
    fn test_render_time_stats_all() {
        let stats = TimeStats {
            month: Some(Counted { value: 6, count: 10 }),
            weekday: Some(Counted {
                value: "Friday".to_string(),
                count: 4,
            }),
            hour: Counted { value: 17, count: 3 },
        };
        let text = render_time_stats(&stats, &Filters::debug());
        assert_eq!(
            text,
            "Most common month: 6, count: 10, for weekday: All\n\
             Most common day of week: Friday, count: 4, for month: All\n\
             Most common start hour: 17, count: 3, for month: All and weekday: All"
        );
    }

    #[test]
    fn test_render_time_stats_filtered() {
        let stats = TimeStats {
            month: None,
            weekday: None,
            hour: Counted { value: 8, count: 1 },
        };
        let text = render_time_stats(&stats, &january_mondays());
        assert_eq!(
            text,
            "Most common start hour: 8, count: 1, for month: January and weekday: Monday"
        );
    }

    #[test]
    fn test_render_station_stats() {
        let stats = StationStats {
            start_station: Counted {
                value: "Canal St".to_string(),
                count: 2,
            },
            end_station: Counted {
                value: "Clark St".to_string(),
                count: 1,
            },
            trip: Counted {
                value: "Canal St to Clark St".to_string(),
                count: 1,
            },
        };
        let text = render_station_stats(&stats, &january_mondays());
        assert!(text.starts_with(
            "Most common start station: Canal St, count: 2, for month: January and weekday: Monday"
        ));
        assert!(text.ends_with(
            "Most common trip: Canal St to Clark St, count: 1, for month: January and weekday: Monday"
        ));
    }

    #[test]
    fn test_render_duration_stats() {
        let stats = DurationStats {
            total_seconds: 60.0,
            mean_seconds: 20.0,
            integer_total: true,
        };
        assert_eq!(
            render_duration_stats(&stats, &Filters::debug()),
            "Total travel time: 60 seconds or 0:01:00, for month: All and weekday: All\n\
             Mean travel time: 20 seconds or 0:00:20, for month: All and weekday: All"
        );
    }

    #[test]
    fn test_render_duration_stats_fractional_column() {
        let stats = DurationStats {
            total_seconds: 600.0,
            mean_seconds: 300.0,
            integer_total: false,
        };
        assert!(render_duration_stats(&stats, &Filters::debug())
            .starts_with("Total travel time: 600.0 seconds or 0:10:00, "));
    }

    #[test]
    fn test_render_user_stats() {
        let stats = UserStats {
            user_types: vec![
                Share {
                    value: "Subscriber".to_string(),
                    count: 3,
                    fraction: 0.75,
                },
                Share {
                    value: "Customer".to_string(),
                    count: 1,
                    fraction: 0.25,
                },
            ],
            genders: None,
            birth_years: Some(BirthYears {
                earliest: 1950,
                most_recent: 2001,
                most_common: 1989,
            }),
        };
        let text = render_user_stats(&stats, &Filters::debug());
        assert!(text.starts_with(
            "User counts: \nSubscriber: 3 or 75.0%, \nCustomer: 1 or 25.0%, \nfor month: All and weekday: All"
        ));
        assert!(text.contains("\n\nNo gender data of users."));
        assert!(text.ends_with(
            "User year of birth: Earliest: 1950, most recent: 2001, most common: 1989, for month: All and weekday: All"
        ));
    }

    #[test]
    fn test_render_user_stats_without_birth_year() {
        let stats = UserStats {
            user_types: vec![],
            genders: Some(vec![Share {
                value: "Female".to_string(),
                count: 1,
                fraction: 1.0,
            }]),
            birth_years: None,
        };
        let text = render_user_stats(&stats, &Filters::debug());
        assert!(text.contains("User genders: \nFemale: 1 or 100.0%, "));
        assert!(text.ends_with("No year of birth data of users."));
    }

    #[test]
    fn test_render_row() {
        let table = sample_table();
        let text = render_row(table.headers(), &table.rows()[0]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "index: 1");
        assert_eq!(lines[1], "Start Time: 2017-01-02 08:05:00");
        assert!(lines.contains(&"Gender: Male"));
        assert_eq!(lines[lines.len() - 2], "month: 1");
        assert_eq!(lines[lines.len() - 1], "day_of_week: Monday");
        assert!(!text.contains("Start End Station"));
    }

    #[test]
    fn test_write_section_frames_body() {
        let mut out = Vec::new();
        write_section(&mut out, DURATION_HEADING, "body", Duration::from_millis(5)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\nCalculating Trip Duration...\n\nbody\n"));
        assert!(text.contains("This took 0.005 seconds."));
        assert!(text.trim_end().ends_with(SEPARATOR));
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        let stats = DurationStats {
            total_seconds: 60.0,
            mean_seconds: 20.0,
            integer_total: true,
        };
        write_json(&mut out, &stats).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["total_seconds"], 60.0);
    }
}
