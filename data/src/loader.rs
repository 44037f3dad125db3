use std::io;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;

use crate::bar::{Bar, BarSeries, BarTime};

const STAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const CLOCK_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Open")]
    open: f32,
    #[serde(rename = "High")]
    high: f32,
    #[serde(rename = "Low")]
    low: f32,
    #[serde(rename = "Close")]
    close: f32,
}

pub fn load(path: &Path) -> Result<BarSeries, Error> {
    let file = std::fs::File::open(path)?;
    let series = parse(file)?;

    log::info!("loaded {} bars from {}", series.len(), path.display());

    Ok(series)
}

/// Reads `Time,Open,High,Low,Close` rows in file order. Other columns are ignored.
pub fn parse<R: io::Read>(reader: R) -> Result<BarSeries, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();

    for (i, record) in reader.deserialize::<Row>().enumerate() {
        let row = record?;

        let time = parse_time(&row.time).ok_or_else(|| Error::Time {
            row: i + 1,
            value: row.time.clone(),
        })?;

        bars.push(Bar::new(time, row.open, row.high, row.low, row.close));
    }

    if bars.is_empty() {
        return Err(Error::Empty);
    }

    if bars.windows(2).any(|pair| pair[0].time > pair[1].time) {
        log::warn!("bars are not in chronological order, keeping file order");
    }

    Ok(BarSeries::new(bars))
}

pub fn parse_time(value: &str) -> Option<BarTime> {
    let value = value.trim();

    STAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .map(BarTime::Stamp)
        .or_else(|| {
            CLOCK_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
                .map(BarTime::Clock)
        })
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognized time `{value}`")]
    Time { row: usize, value: String },
    #[error("no bars found")]
    Empty,
}
