//! The interactive driver: choose filters, load, report, page, restart.

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::filters::{Filters, get_filters, read_answer};
use crate::output::{
    DURATION_HEADING, STATION_HEADING, TIME_HEADING, USER_HEADING, render_duration_stats,
    render_station_stats, render_time_stats, render_user_stats, write_json, write_rows,
    write_section,
};
use crate::pager::RowPager;
use crate::stats::{duration_stats, station_stats, time_stats, user_stats};
use crate::table::{TripTable, load_data};

const FIRST_PAGE: &str = "Would you like to see the data of 5 trips? Enter yes or no.";
const NEXT_PAGE: &str = "Would you like to see 5 more trips? Enter yes or no.";
const RESTART: &str = "Would you like to restart? Enter yes or no.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Skip the filter prompts and use [`Filters::debug`].
    pub debug: bool,
    /// Also print every report as JSON.
    pub json: bool,
}

/// Asks a yes/no question. Only `y`/`yes` count as yes; a closed input is no.
pub fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<bool> {
    writeln!(output, "\n{question}")?;
    output.flush()?;
    let answer = read_answer(input)?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub struct Session<R, W> {
    config: AppConfig,
    options: SessionOptions,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: AppConfig, options: SessionOptions, input: R, output: W) -> Self {
        Self {
            config,
            options,
            input,
            output,
        }
    }

    /// Runs iterations until the user declines to restart.
    ///
    /// # Errors
    ///
    /// Any load or aggregation failure ends the whole run.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::Running;
        let mut iteration = 0usize;
        while state == State::Running {
            iteration += 1;
            state = self.step().with_context(|| format!("Session {iteration} failed"))?;
        }
        info!(iterations = iteration, "Session stopped");
        Ok(())
    }

    /// One full pass through the flow; returns the next state.
    pub fn step(&mut self) -> Result<State> {
        writeln!(self.output, "\n")?;
        let filters = if self.options.debug {
            Filters::debug()
        } else {
            get_filters(&mut self.input, &mut self.output)?
        };
        info!(
            city = filters.city.name(),
            month = filters.month.title(),
            day = filters.day.title(),
            "Filters selected"
        );

        let table = load_data(&self.config.city_path(filters.city), &filters)?;

        self.report(&table, &filters)?;
        self.page(&table)?;

        let restart = ask_yes_no(&mut self.input, &mut self.output, RESTART)?;
        Ok(if restart { State::Running } else { State::Stopped })
    }

    fn report(&mut self, table: &TripTable, filters: &Filters) -> Result<()> {
        let started = Instant::now();
        let stats = time_stats(table, filters)?;
        let body = render_time_stats(&stats, filters);
        write_section(&mut self.output, TIME_HEADING, &body, started.elapsed())?;
        self.maybe_json(&stats)?;

        let started = Instant::now();
        let stats = station_stats(table)?;
        let body = render_station_stats(&stats, filters);
        write_section(&mut self.output, STATION_HEADING, &body, started.elapsed())?;
        self.maybe_json(&stats)?;

        let started = Instant::now();
        let stats = duration_stats(table)?;
        let body = render_duration_stats(&stats, filters);
        write_section(&mut self.output, DURATION_HEADING, &body, started.elapsed())?;
        self.maybe_json(&stats)?;

        let started = Instant::now();
        let stats = user_stats(table)?;
        let body = render_user_stats(&stats, filters);
        write_section(&mut self.output, USER_HEADING, &body, started.elapsed())?;
        self.maybe_json(&stats)?;

        Ok(())
    }

    fn maybe_json(&mut self, report: &impl serde::Serialize) -> Result<()> {
        if self.options.json {
            write_json(&mut self.output, report)?;
        }
        Ok(())
    }

    /// Shows chunks for as long as the user keeps answering yes.
    fn page(&mut self, table: &TripTable) -> Result<()> {
        let mut pager = RowPager::new(table.rows());
        let mut question = FIRST_PAGE;

        while pager.remaining() > 0 {
            if !ask_yes_no(&mut self.input, &mut self.output, question)? {
                break;
            }
            let Some(chunk) = pager.next() else {
                break;
            };
            debug!(start = chunk.start, rows = chunk.rows.len(), "Showing chunk");
            write_rows(&mut self.output, table, chunk.rows)?;
            question = NEXT_PAGE;
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
