use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use time::Date;

/// Lessons and marks of each day, in calendar order.
pub type DayEntries = BTreeMap<Date, Vec<DayEntry>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub name: String,
    pub full_name: Option<String>,
}

impl Lesson {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: None,
        }
    }

    pub fn with_full_name(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: Some(full_name.into()),
        }
    }
}

/// Keeps only rows of the lesson with exactly this name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonFilter {
    name: String,
}

impl LessonFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name
    }
}

impl From<&Lesson> for LessonFilter {
    fn from(lesson: &Lesson) -> Self {
        Self::new(lesson.name.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkValue {
    Absent,
    Numeric(u32),
    /// Non-numeric grade token, e.g. `н` for a missed lesson.
    Raw(String),
}

impl MarkValue {
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return MarkValue::Absent;
        }
        if token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = token.parse() {
                return MarkValue::Numeric(value);
            }
        }
        MarkValue::Raw(token.to_string())
    }

    pub fn as_numeric(&self) -> Option<u32> {
        match self {
            MarkValue::Numeric(value) => Some(*value),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, MarkValue::Absent)
    }
}

impl fmt::Display for MarkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkValue::Absent => Ok(()),
            MarkValue::Numeric(value) => write!(f, "{value}"),
            MarkValue::Raw(value) => f.write_str(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mark {
    Single {
        lesson: Lesson,
        value: MarkValue,
        date: Option<Date>,
    },
    /// Two grades recorded together for one lesson, shown as `a/b`.
    Split {
        lesson: Lesson,
        first: u32,
        second: u32,
        date: Option<Date>,
    },
}

impl Mark {
    pub fn single(lesson: Lesson, value: MarkValue, date: Option<Date>) -> Self {
        Mark::Single {
            lesson,
            value,
            date,
        }
    }

    pub fn split(lesson: Lesson, first: u32, second: u32, date: Option<Date>) -> Self {
        Mark::Split {
            lesson,
            first,
            second,
            date,
        }
    }

    pub fn lesson(&self) -> &Lesson {
        match self {
            Mark::Single { lesson, .. } | Mark::Split { lesson, .. } => lesson,
        }
    }

    pub fn date(&self) -> Option<Date> {
        match self {
            Mark::Single { date, .. } | Mark::Split { date, .. } => *date,
        }
    }

    pub(crate) fn set_date(&mut self, day: Date) {
        match self {
            Mark::Single { date, .. } | Mark::Split { date, .. } => *date = Some(day),
        }
    }

    /// Display value. A split mark reads as `a/b`.
    pub fn value(&self) -> MarkValue {
        match self {
            Mark::Single { value, .. } => value.clone(),
            Mark::Split { first, second, .. } => MarkValue::Raw(format!("{first}/{second}")),
        }
    }

    pub fn first_mark(&self) -> Option<u32> {
        match self {
            Mark::Split { first, .. } => Some(*first),
            Mark::Single { .. } => None,
        }
    }

    pub fn second_mark(&self) -> Option<u32> {
        match self {
            Mark::Split { second, .. } => Some(*second),
            Mark::Single { .. } => None,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Mark::Split { .. })
    }
}

/// One lesson row of a day: a bare lesson when nothing was graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayEntry {
    Lesson(Lesson),
    Mark(Mark),
}

impl DayEntry {
    /// Builds the entry for `lesson` from the grade token of its row.
    pub fn from_grade(lesson: Lesson, token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            return DayEntry::Lesson(lesson);
        }
        if let Some((first, second)) = token.split_once('/') {
            match (first.trim().parse(), second.trim().parse()) {
                (Ok(first), Ok(second)) => {
                    return DayEntry::Mark(Mark::split(lesson, first, second, None));
                }
                _ => tracing::warn!(
                    lesson = %lesson.name,
                    token,
                    "Split mark is not numeric, keeping it as raw"
                ),
            }
        }
        DayEntry::Mark(Mark::single(lesson, MarkValue::from_token(token), None))
    }

    pub fn lesson(&self) -> &Lesson {
        match self {
            DayEntry::Lesson(lesson) => lesson,
            DayEntry::Mark(mark) => mark.lesson(),
        }
    }

    pub fn mark(&self) -> Option<&Mark> {
        match self {
            DayEntry::Mark(mark) => Some(mark),
            DayEntry::Lesson(_) => None,
        }
    }

    pub fn into_mark(self) -> Option<Mark> {
        match self {
            DayEntry::Mark(mark) => Some(mark),
            DayEntry::Lesson(_) => None,
        }
    }
}

/// Day label as the portal prints it, `dd.mm`.
pub fn day_label(date: Date) -> String {
    format!("{:02}.{:02}", date.day(), u8::from(date.month()))
}

/// Flattens marks into plain values. A split mark gives both of its numbers.
pub fn convert_marks_list(marks: &[Mark]) -> Vec<MarkValue> {
    let mut values = Vec::with_capacity(marks.len());
    for mark in marks {
        match mark {
            Mark::Single { value, .. } => values.push(value.clone()),
            Mark::Split { first, second, .. } => {
                values.push(MarkValue::Numeric(*first));
                values.push(MarkValue::Numeric(*second));
            }
        }
    }
    values
}

/// Mean of the numeric values, `None` when there are none.
pub fn average(values: &[MarkValue]) -> Option<f64> {
    let numeric = values
        .iter()
        .filter_map(MarkValue::as_numeric)
        .collect::<Vec<_>>();
    if numeric.is_empty() {
        return None;
    }
    let sum: u64 = numeric.iter().map(|v| u64::from(*v)).sum();
    Some(sum as f64 / numeric.len() as f64)
}
