//! Interactive selection of city, month and weekday.
//!
//! Every answer is matched case-insensitively against a fixed allow-list.
//! Unknown answers re-prompt forever; only a closed input stream ends the
//! loop with an error.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{Month, Weekday};
use tracing::debug;

use crate::config::City;
use crate::error::BikeshareError;

pub const SEPARATOR: &str = "----------------------------------------";

/// Months that can be selected. Data files only cover the first half year.
pub const MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Full English name of a weekday, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    Only(Month),
}

impl MonthFilter {
    pub fn parse(answer: &str) -> Option<Self> {
        let answer = answer.trim().to_lowercase();
        if answer == "all" {
            return Some(MonthFilter::All);
        }
        MONTHS
            .iter()
            .find(|m| m.name().to_lowercase() == answer)
            .map(|m| MonthFilter::Only(*m))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, MonthFilter::All)
    }

    pub fn title(&self) -> &'static str {
        match self {
            MonthFilter::All => "All",
            MonthFilter::Only(m) => m.name(),
        }
    }

    /// Whether a derived month number (1-12) passes the filter.
    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(m) => m.number_from_month() == month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn parse(answer: &str) -> Option<Self> {
        let answer = answer.trim().to_lowercase();
        if answer == "all" {
            return Some(DayFilter::All);
        }
        WEEKDAYS
            .iter()
            .find(|d| weekday_name(**d).to_lowercase() == answer)
            .map(|d| DayFilter::Only(*d))
    }

    pub fn is_all(&self) -> bool {
        matches!(self, DayFilter::All)
    }

    pub fn title(&self) -> &'static str {
        match self {
            DayFilter::All => "All",
            DayFilter::Only(d) => weekday_name(*d),
        }
    }

    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(d) => *d == day,
        }
    }
}

/// Parses a free-text city answer, accepting the listed abbreviations.
pub fn parse_city(answer: &str) -> Option<City> {
    match answer.trim().to_lowercase().as_str() {
        "c" | "chicago" | "[c]hicago" => Some(City::Chicago),
        "n" | "ny" | "nyc" | "new york" | "new york city" | "[n]ew york city" => {
            Some(City::NewYorkCity)
        }
        "w" | "washington" | "[w]ashington" => Some(City::Washington),
        _ => None,
    }
}

/// The user's selection for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filters {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl Filters {
    /// Fixed selection used when prompts are skipped.
    pub fn debug() -> Self {
        Filters {
            city: City::Chicago,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }
}

/// Reads one line. `None` means the input is closed.
pub fn read_answer<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Asks `question` until `parse` accepts the answer, printing `error` after
/// each rejected one.
pub fn prompt_until<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    question: &str,
    error: &str,
    parse: F,
) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Option<T>,
{
    loop {
        writeln!(output, "{question}")?;
        output.flush()?;

        let Some(answer) = read_answer(input)? else {
            return Err(BikeshareError::InputClosed {
                prompt: question.to_string(),
            }
            .into());
        };

        match parse(&answer) {
            Some(value) => return Ok(value),
            None => {
                debug!(answer = %answer, "Rejected answer");
                writeln!(output, "\n{error}")?;
            }
        }
    }
}

/// Asks for city, month and weekday in turn.
pub fn get_filters<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Filters> {
    writeln!(output, "Hello! Let's explore some US bikeshare data!")?;

    let city = prompt_until(
        input,
        output,
        "Please enter the city you want to analyze: [C]hicago, [N]ew York City, or [W]ashington?",
        "Invalid input, please choose one of the listed cities.",
        parse_city,
    )?;
    writeln!(output, "{} selected.\n", city.title())?;

    let month = prompt_until(
        input,
        output,
        "Do you want to filter the data for one month?\n\
         Enter one of the months \"January\" to \"June\" for filtering the data, or \"all\" to use all data.",
        "Invalid input, please choose one of the months (enter full name) or \"all\".",
        MonthFilter::parse,
    )?;
    writeln!(output, "{} selected.\n", month.title())?;

    let day = prompt_until(
        input,
        output,
        "Do you want to filter the data for one weekday?\n\
         Enter e.g. \"Monday\" for filtering the data, or \"all\" to use all data.",
        "Invalid input, please choose one of the weekdays (enter full name) or \"all\".",
        DayFilter::parse,
    )?;
    writeln!(output, "{} selected.\n", day.title())?;

    writeln!(output, "{SEPARATOR}")?;
    Ok(Filters { city, month, day })
}
