//! Crawler for the schools.by student gradebook.
//!
//! A [`Gradebook`] walks the weekly pages of a quarter concurrently and turns
//! them into [`Lesson`]s and [`Mark`]s keyed by calendar date. Login is not part
//! of this crate: it starts from an already authenticated [`Session`].
pub mod config;
pub mod error;
pub mod fetch;
pub mod gradebook;
pub mod interval;
mod lessons;
mod marks;
pub mod model;
pub mod parse;
mod quarters;

#[cfg(test)]
mod test_utils;

pub use config::GradebookConfig;
pub use error::{Error, ErrorKind, Result};
pub use fetch::{GradebookPage, HttpFetcher, PageFetcher, QuarterId, Session};
pub use gradebook::Gradebook;
pub use interval::{IntervalSource, Quarter, QuarterInterval, QuarterIntervals};
pub use model::{
    DayEntries, DayEntry, Lesson, LessonFilter, Mark, MarkValue, average, convert_marks_list,
    day_label,
};
pub use parse::CurrentQuarter;
