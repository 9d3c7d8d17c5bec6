use std::{collections::BTreeMap, fmt, future::Future};

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::error::{Error, Result};

/// School-year grading period, ordinal 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quarter(u8);

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter(1), Quarter(2), Quarter(3), Quarter(4)];

    const MENU_LABEL_SUFFIX: &'static str = "четверть";

    pub fn new(number: u8) -> Result<Self> {
        if (1..=4).contains(&number) {
            Ok(Self(number))
        } else {
            Err(Error::invalid_argument(format!(
                "Quarter must be between 1 and 4, got {number}"
            )))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based column of this quarter in the summary table.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// Label of the quarter in the portal's quarter menu, e.g. `3 четверть`.
    pub fn menu_label(self) -> String {
        format!("{} {}", self.0, Self::MENU_LABEL_SUFFIX)
    }
}

impl TryFrom<u8> for Quarter {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

impl From<Quarter> for u8 {
    fn from(quarter: Quarter) -> Self {
        quarter.0
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive calendar range of a quarter. Only built through [`QuarterInterval::new`],
/// deserialization included, so `end >= start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct QuarterInterval {
    start: Date,
    end: Date,
}

#[derive(Deserialize)]
struct RawInterval {
    start: Date,
    end: Date,
}

impl TryFrom<RawInterval> for QuarterInterval {
    type Error = Error;

    fn try_from(raw: RawInterval) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl QuarterInterval {
    pub const DAYS_PER_PAGE: u32 = 7;

    pub fn new(start: Date, end: Date) -> Result<Self> {
        if end < start {
            return Err(Error::invalid_argument(format!(
                "Quarter interval ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Number of week pages covering `[start, end]`. The last one may be partial.
    pub fn pages_count(&self) -> u32 {
        let days = u64::try_from((self.end - self.start).whole_days() + 1).unwrap_or(0);
        u32::try_from(days.div_ceil(u64::from(Self::DAYS_PER_PAGE))).unwrap_or(u32::MAX)
    }

    /// Date of day `day_offset` on 1-indexed `page`.
    pub fn page_date(&self, page: u32, day_offset: u32) -> Date {
        let days = i64::from(page.saturating_sub(1)) * i64::from(Self::DAYS_PER_PAGE)
            + i64::from(day_offset);
        self.start.saturating_add(Duration::days(days))
    }

    pub fn page_start(&self, page: u32) -> Date {
        self.page_date(page, 0)
    }

    pub(crate) fn check_page(&self, page: u32) -> Result<()> {
        let pages = self.pages_count();
        if page == 0 || page > pages {
            return Err(Error::invalid_argument(format!(
                "Page {page} is outside of the quarter (1..={pages})"
            )));
        }
        Ok(())
    }
}

/// Intervals of every configured quarter of a school year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterIntervals(BTreeMap<Quarter, QuarterInterval>);

impl QuarterIntervals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, quarter: Quarter, interval: QuarterInterval) {
        self.0.insert(quarter, interval);
    }

    pub fn get(&self, quarter: Quarter) -> Option<&QuarterInterval> {
        self.0.get(&quarter)
    }

    pub fn interval(&self, quarter: Quarter) -> Result<&QuarterInterval> {
        self.get(quarter)
            .ok_or_else(|| Error::unresolved_quarter(quarter))
    }

    pub fn pages_count(&self, quarter: Quarter) -> Result<u32> {
        Ok(self.interval(quarter)?.pages_count())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quarter, &QuarterInterval)> {
        self.0.iter().map(|(quarter, interval)| (*quarter, interval))
    }
}

impl FromIterator<(Quarter, QuarterInterval)> for QuarterIntervals {
    fn from_iter<T: IntoIterator<Item = (Quarter, QuarterInterval)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Supplier of the school calendar. The intervals come from outside the gradebook.
pub trait IntervalSource {
    fn intervals(&self) -> impl Future<Output = Result<QuarterIntervals>> + Send;
}

impl IntervalSource for QuarterIntervals {
    async fn intervals(&self) -> Result<QuarterIntervals> {
        Ok(self.clone())
    }
}
