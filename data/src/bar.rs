use chrono::{NaiveDateTime, NaiveTime};

/// Either a bare time of day or a full timestamp, whichever the source provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BarTime {
    Clock(NaiveTime),
    Stamp(NaiveDateTime),
}

impl BarTime {
    pub fn clock(&self) -> NaiveTime {
        match self {
            BarTime::Clock(time) => *time,
            BarTime::Stamp(datetime) => datetime.time(),
        }
    }

    pub fn stamp(&self) -> Option<NaiveDateTime> {
        match self {
            BarTime::Clock(_) => None,
            BarTime::Stamp(datetime) => Some(*datetime),
        }
    }
}

impl From<NaiveTime> for BarTime {
    fn from(time: NaiveTime) -> Self {
        BarTime::Clock(time)
    }
}

impl From<NaiveDateTime> for BarTime {
    fn from(datetime: NaiveDateTime) -> Self {
        BarTime::Stamp(datetime)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub time: BarTime,
    pub open: f32,
    pub high: f32,
    pub low: f32,
    pub close: f32,
}

impl Bar {
    pub fn new(time: impl Into<BarTime>, open: f32, high: f32, low: f32, close: f32) -> Self {
        Self {
            time: time.into(),
            open,
            high,
            low,
            close,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    pub fn spread(&self) -> f32 {
        self.high - self.low
    }
}

/// Chronologically ordered bars, read-only once built.
///
/// Price extremes and the mean high-low spread are computed once here, the
/// transform and the price labels read them on every frame.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
    price_min: f32,
    price_max: f32,
    mean_spread: f32,
}

impl BarSeries {
    pub fn new(bars: Vec<Bar>) -> Self {
        if bars.is_empty() {
            return Self::default();
        }

        let (price_min, price_max, spread_sum) = bars.iter().fold(
            (f32::MAX, f32::MIN, 0.0_f64),
            |(min, max, sum), bar| {
                (
                    min.min(bar.low),
                    max.max(bar.high),
                    sum + f64::from(bar.spread()),
                )
            },
        );

        let mean_spread = (spread_sum / bars.len() as f64) as f32;

        Self {
            bars,
            price_min,
            price_max,
            mean_spread,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn price_min(&self) -> f32 {
        self.price_min
    }

    pub fn price_max(&self) -> f32 {
        self.price_max
    }

    pub fn price_range(&self) -> f32 {
        self.price_max - self.price_min
    }

    pub fn mean_spread(&self) -> f32 {
        self.mean_spread
    }
}

impl FromIterator<Bar> for BarSeries {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minute(m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(9, m, 0).unwrap()
    }

    #[test]
    fn extremes_and_mean_spread() {
        let series = BarSeries::new(vec![
            Bar::new(minute(0), 10.0, 12.0, 9.0, 11.0),
            Bar::new(minute(1), 11.0, 15.0, 10.0, 14.0),
            Bar::new(minute(2), 14.0, 14.5, 8.5, 9.0),
        ]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.price_min(), 8.5);
        assert_eq!(series.price_max(), 15.0);
        assert!((series.mean_spread() - 14.0 / 3.0).abs() < 1e-5);
        assert_eq!(series.latest().map(|bar| bar.close), Some(9.0));
    }

    #[test]
    fn empty_series_is_zeroed() {
        let series = BarSeries::new(Vec::new());

        assert!(series.is_empty());
        assert_eq!(series.price_min(), 0.0);
        assert_eq!(series.price_max(), 0.0);
        assert_eq!(series.mean_spread(), 0.0);
        assert!(series.latest().is_none());
    }

    #[test]
    fn direction_includes_doji_as_bullish() {
        assert!(Bar::new(minute(0), 5.0, 6.0, 4.0, 5.0).is_bullish());
        assert!(!Bar::new(minute(0), 5.0, 6.0, 4.0, 4.5).is_bullish());
    }
}
