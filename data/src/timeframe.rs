use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use regex::Regex;

use crate::bar::BarTime;

pub const DEFAULT_LADDER: [&str; 13] = [
    "m1", "m5", "m15", "m30", "h1", "h2", "h4", "1d", "1W", "1M", "6M", "1Y", "4Y",
];

pub const DEFAULT_LADDER_INDEX: usize = 2;

// unit-first ("m15", "h4") or count-first ("1d", "6M", "4Y")
static TIMEFRAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([mhdWMY])(\d+)|(\d+)([mhdWMY]))$").expect("timeframe pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(TimeUnit::Minute),
            "h" => Some(TimeUnit::Hour),
            "d" => Some(TimeUnit::Day),
            "W" => Some(TimeUnit::Week),
            "M" => Some(TimeUnit::Month),
            "Y" => Some(TimeUnit::Year),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            TimeUnit::Minute => 'm',
            TimeUnit::Hour => 'h',
            TimeUnit::Day => 'd',
            TimeUnit::Week => 'W',
            TimeUnit::Month => 'M',
            TimeUnit::Year => 'Y',
        }
    }

    pub fn is_intraday(self) -> bool {
        matches!(self, TimeUnit::Minute | TimeUnit::Hour)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid timeframe `{0}`")]
pub struct ParseTimeframeError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timeframe {
    pub unit: TimeUnit,
    pub interval: u32,
}

impl Timeframe {
    pub const M1: Timeframe = Timeframe {
        unit: TimeUnit::Minute,
        interval: 1,
    };

    pub fn new(unit: TimeUnit, interval: u32) -> Self {
        Self {
            unit,
            interval: interval.max(1),
        }
    }

    /// Parses a ladder entry, falling back to one minute when it is malformed.
    pub fn parse_or_default(label: &str) -> Self {
        label.parse().unwrap_or_else(|err| {
            log::warn!("{err}, falling back to {}", Timeframe::M1);
            Timeframe::M1
        })
    }

    /// Whether a bar time sits exactly on a boundary of this timeframe.
    ///
    /// Time-of-day values carry no calendar date, so they never qualify for
    /// day or coarser units.
    pub fn is_boundary(&self, time: &BarTime) -> bool {
        let interval = self.interval.max(1);
        let clock = time.clock();

        match self.unit {
            TimeUnit::Minute => clock.minute() % interval == 0 && clock.second() == 0,
            TimeUnit::Hour => clock.hour() % interval == 0 && clock.minute() == 0,
            TimeUnit::Day | TimeUnit::Week | TimeUnit::Month | TimeUnit::Year => {
                let Some(stamp) = time.stamp().filter(|stamp| stamp.time() == NaiveTime::MIN)
                else {
                    return false;
                };

                match self.unit {
                    TimeUnit::Day => stamp.day() % interval == 0,
                    TimeUnit::Week => {
                        stamp.weekday() == Weekday::Mon && stamp.iso_week().week() % interval == 0
                    }
                    TimeUnit::Month => stamp.day() == 1 && stamp.month0() % interval == 0,
                    TimeUnit::Year => {
                        stamp.ordinal() == 1 && stamp.year().rem_euclid(interval as i32) == 0
                    }
                    TimeUnit::Minute | TimeUnit::Hour => false,
                }
            }
        }
    }

    pub fn format(&self, time: &BarTime) -> String {
        match (time, self.unit) {
            (BarTime::Clock(clock), _) => clock.format("%H:%M").to_string(),
            (BarTime::Stamp(stamp), TimeUnit::Minute | TimeUnit::Hour) => {
                stamp.format("%H:%M").to_string()
            }
            (BarTime::Stamp(stamp), TimeUnit::Day | TimeUnit::Week) => {
                stamp.format("%d-%m").to_string()
            }
            (BarTime::Stamp(stamp), TimeUnit::Month) => stamp.format("%b %Y").to_string(),
            (BarTime::Stamp(stamp), TimeUnit::Year) => stamp.format("%Y").to_string(),
        }
    }
}

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseTimeframeError(s.to_string());

        let caps = TIMEFRAME_RE.captures(s.trim()).ok_or_else(invalid)?;

        let (unit, count) = match (caps.get(1), caps.get(2), caps.get(3), caps.get(4)) {
            (Some(unit), Some(count), _, _) | (_, _, Some(count), Some(unit)) => {
                (unit.as_str(), count.as_str())
            }
            _ => return Err(invalid()),
        };

        let unit = TimeUnit::from_code(unit).ok_or_else(invalid)?;
        let interval = count.parse::<u32>().map_err(|_| invalid())?;

        if interval == 0 {
            return Err(invalid());
        }

        Ok(Timeframe { unit, interval })
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_intraday() {
            write!(f, "{}{}", self.unit.code(), self.interval)
        } else {
            write!(f, "{}{}", self.interval, self.unit.code())
        }
    }
}

/// Ordered label granularities plus the index currently in use.
#[derive(Debug, Clone, PartialEq)]
pub struct Ladder {
    frames: Vec<Timeframe>,
    index: usize,
}

impl Ladder {
    pub fn new(frames: Vec<Timeframe>, index: usize) -> Self {
        let frames = if frames.is_empty() {
            vec![Timeframe::M1]
        } else {
            frames
        };
        let index = index.min(frames.len() - 1);

        Self { frames, index }
    }

    pub fn from_labels<S: AsRef<str>>(labels: &[S], index: usize) -> Self {
        let frames = labels
            .iter()
            .map(|label| Timeframe::parse_or_default(label.as_ref()))
            .collect();

        Self::new(frames, index)
    }

    pub fn current(&self) -> Timeframe {
        self.frames[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Timeframe] {
        &self.frames
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index.min(self.frames.len() - 1);
    }

    /// Moves one entry toward the finest granularity. Returns whether it moved.
    pub fn step_finer(&mut self) -> bool {
        let moved = self.index > 0;
        self.index = self.index.saturating_sub(1);
        moved
    }

    /// Moves one entry toward the coarsest granularity. Returns whether it moved.
    pub fn step_coarser(&mut self) -> bool {
        let last = self.frames.len() - 1;
        let moved = self.index < last;
        self.index = (self.index + 1).min(last);
        moved
    }
}

impl Default for Ladder {
    fn default() -> Self {
        Self::from_labels(&DEFAULT_LADDER, DEFAULT_LADDER_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> BarTime {
        BarTime::Stamp(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        )
    }

    fn clock(h: u32, m: u32) -> BarTime {
        BarTime::Clock(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    #[test]
    fn parses_both_notations() {
        assert_eq!(
            "m15".parse::<Timeframe>().unwrap(),
            Timeframe::new(TimeUnit::Minute, 15)
        );
        assert_eq!(
            "h4".parse::<Timeframe>().unwrap(),
            Timeframe::new(TimeUnit::Hour, 4)
        );
        assert_eq!(
            "6M".parse::<Timeframe>().unwrap(),
            Timeframe::new(TimeUnit::Month, 6)
        );
        assert_eq!(
            "1W".parse::<Timeframe>().unwrap(),
            Timeframe::new(TimeUnit::Week, 1)
        );
    }

    #[test]
    fn default_ladder_displays_as_written() {
        let ladder = Ladder::default();
        let labels: Vec<String> = ladder.frames().iter().map(ToString::to_string).collect();

        assert_eq!(labels, DEFAULT_LADDER);
        assert_eq!(ladder.current(), Timeframe::new(TimeUnit::Minute, 15));
    }

    #[test]
    fn malformed_entries_fall_back_to_one_minute() {
        for bad in ["", "x5", "m", "m0", "15", "5q", "m-3"] {
            assert!(bad.parse::<Timeframe>().is_err(), "{bad} should not parse");
            assert_eq!(Timeframe::parse_or_default(bad), Timeframe::M1);
        }

        let ladder = Ladder::from_labels(&["m5", "bogus", "h1"], 1);
        assert_eq!(ladder.current(), Timeframe::M1);
    }

    #[test]
    fn ladder_steps_are_bounded() {
        let mut ladder = Ladder::from_labels(&["m1", "m5", "m15"], 1);

        assert!(ladder.step_finer());
        assert!(!ladder.step_finer());
        assert_eq!(ladder.index(), 0);

        assert!(ladder.step_coarser());
        assert!(ladder.step_coarser());
        assert!(!ladder.step_coarser());
        assert_eq!(ladder.index(), 2);
    }

    #[test]
    fn empty_ladder_and_out_of_range_index_are_clamped() {
        let ladder = Ladder::new(Vec::new(), 7);
        assert_eq!(ladder.len(), 1);
        assert_eq!(ladder.current(), Timeframe::M1);

        let ladder = Ladder::from_labels(&["m1", "m5"], 9);
        assert_eq!(ladder.index(), 1);
    }

    #[test]
    fn intraday_boundaries() {
        let m15 = Timeframe::new(TimeUnit::Minute, 15);
        assert!(m15.is_boundary(&clock(9, 30)));
        assert!(!m15.is_boundary(&clock(9, 31)));
        assert!(
            !m15.is_boundary(&BarTime::Clock(NaiveTime::from_hms_opt(9, 30, 5).unwrap()))
        );

        let h2 = Timeframe::new(TimeUnit::Hour, 2);
        assert!(h2.is_boundary(&clock(10, 0)));
        assert!(!h2.is_boundary(&clock(10, 15)));
        assert!(!h2.is_boundary(&clock(11, 0)));
        assert!(h2.is_boundary(&stamp(2024, 3, 5, 14, 0)));
    }

    #[test]
    fn calendar_boundaries_need_a_date_at_midnight() {
        let day = Timeframe::new(TimeUnit::Day, 1);
        assert!(day.is_boundary(&stamp(2024, 3, 5, 0, 0)));
        assert!(!day.is_boundary(&stamp(2024, 3, 5, 9, 0)));
        assert!(!day.is_boundary(&clock(0, 0)));

        // 2024-03-04 is a Monday
        let week = Timeframe::new(TimeUnit::Week, 1);
        assert!(week.is_boundary(&stamp(2024, 3, 4, 0, 0)));
        assert!(!week.is_boundary(&stamp(2024, 3, 5, 0, 0)));

        let half_year = Timeframe::new(TimeUnit::Month, 6);
        assert!(half_year.is_boundary(&stamp(2024, 1, 1, 0, 0)));
        assert!(half_year.is_boundary(&stamp(2024, 7, 1, 0, 0)));
        assert!(!half_year.is_boundary(&stamp(2024, 3, 1, 0, 0)));

        let four_years = Timeframe::new(TimeUnit::Year, 4);
        assert!(four_years.is_boundary(&stamp(2024, 1, 1, 0, 0)));
        assert!(!four_years.is_boundary(&stamp(2025, 1, 1, 0, 0)));
    }

    #[test]
    fn label_formats_follow_the_unit() {
        let t = stamp(2024, 7, 1, 0, 0);

        assert_eq!(Timeframe::new(TimeUnit::Hour, 1).format(&t), "00:00");
        assert_eq!(Timeframe::new(TimeUnit::Day, 1).format(&t), "01-07");
        assert_eq!(Timeframe::new(TimeUnit::Month, 1).format(&t), "Jul 2024");
        assert_eq!(Timeframe::new(TimeUnit::Year, 1).format(&t), "2024");
        assert_eq!(Timeframe::new(TimeUnit::Year, 1).format(&clock(9, 5)), "09:05");
    }
}
