use backdater_core::{parse_date, Error};
use chrono::NaiveDate;
use colored::Colorize;

use crate::console::Console;

pub const START_DATE_PROMPT: &str = "Enter the starting date (YYYY-MM-DD)";

/// Asks for the first date of the sequence until a valid one is entered.
///
/// A date given with `--start-date` is used without prompting.
pub fn start_date(console: &mut dyn Console, preset: Option<NaiveDate>) -> backdater_core::Result<NaiveDate> {
    if let Some(date) = preset {
        return Ok(date);
    }

    loop {
        let Some(line) = console.read_line(START_DATE_PROMPT)? else {
            return Err(Error::NoStartDate);
        };

        match parse_date(&line) {
            Some(date) => return Ok(date),
            None => console.say(&"Invalid date format. Please use YYYY-MM-DD".red().to_string())?,
        }
    }
}
