use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::{
    error::{Error, Result},
    model::{DayEntry, Lesson, LessonFilter},
};

use super::collapse_whitespace;

static DAYS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.db_days.clearfix").expect("Failed to parse days selector"));
static DAY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.db_day").expect("Failed to parse day selector"));
static TBODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody").expect("Failed to parse tbody selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Failed to parse row selector"));
static LESSON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.lesson").expect("Failed to parse lesson selector"));
static MARK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.mark_box").expect("Failed to parse mark selector"));

/// Length of the ordinal (`1.`, `2.`, ...) in front of every lesson name.
const ORDINAL_PREFIX_LEN: usize = 2;

/// Parses one week page into day blocks, each holding its lesson rows in
/// document order. Marks are returned undated.
pub fn parse_week(html: &str, filter: Option<&LessonFilter>) -> Result<Vec<Vec<DayEntry>>> {
    let document = Html::parse_document(html);
    // The first block is the hidden template, the second one is the shown week.
    let week = document.select(&DAYS_SELECTOR).nth(1).ok_or_else(|| {
        Error::malformed_page("Week container `div.db_days` not found".to_string())
    })?;

    Ok(week
        .select(&DAY_SELECTOR)
        .map(|day| parse_day(day, filter))
        .collect())
}

fn parse_day(day: ElementRef, filter: Option<&LessonFilter>) -> Vec<DayEntry> {
    let Some(body) = day.select(&TBODY_SELECTOR).next() else {
        return Vec::new();
    };
    body.select(&ROW_SELECTOR)
        .filter_map(|row| parse_row(row, filter))
        .collect()
}

fn parse_row(row: ElementRef, filter: Option<&LessonFilter>) -> Option<DayEntry> {
    let name = lesson_name(&row.select(&LESSON_SELECTOR).next()?.text().collect::<String>());
    if name.is_empty() {
        return None;
    }
    if filter.is_some_and(|filter| !filter.matches(&name)) {
        return None;
    }
    let token = row
        .select(&MARK_SELECTOR)
        .next()
        .map(|mark| mark.text().collect::<String>().replace('\n', ""))
        .unwrap_or_default();
    Some(DayEntry::from_grade(Lesson::new(name), &token))
}

fn lesson_name(cell_text: &str) -> String {
    let text = cell_text.replace('\n', "");
    collapse_whitespace(&text.chars().skip(ORDINAL_PREFIX_LEN).collect::<String>())
}
