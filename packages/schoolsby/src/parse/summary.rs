use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::{
    error::{Error, Result},
    interval::Quarter,
    model::{Lesson, Mark, MarkValue},
};

use super::{ElementRefExt as _, find_by_id};

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div[id]").expect("Failed to parse container selector"));
static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table[id]").expect("Failed to parse table selector"));
static TBODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody").expect("Failed to parse tbody selector"));
static LESSON_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("Failed to parse lesson link selector"));
static MARKS_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr.marks").expect("Failed to parse marks row selector"));
static QUARTER_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.qmark").expect("Failed to parse quarter cell selector"));

/// Lessons listed on the last page, with their full titles.
pub fn parse_lessons(html: &str, student_id: u64) -> Result<Vec<Lesson>> {
    let document = Html::parse_document(html);
    lessons(&document, student_id)
}

/// One mark per lesson for `quarter`, read from the summary table of the last page.
pub fn parse_quarter_summary(html: &str, student_id: u64, quarter: Quarter) -> Result<Vec<Mark>> {
    let document = Html::parse_document(html);
    let lessons = lessons(&document, student_id)?;

    let table_id = format!("daybook-last-page-table-{student_id}");
    let rows = find_by_id(&document, &TABLE_SELECTOR, &table_id)
        .and_then(|table| table.select(&TBODY_SELECTOR).next())
        .ok_or_else(|| Error::malformed_page(format!("Summary table `#{table_id}` not found")))?
        .select(&MARKS_ROW_SELECTOR)
        .collect::<Vec<_>>();

    if rows.len() != lessons.len() {
        return Err(Error::malformed_page(format!(
            "Summary has {} lessons but {} mark rows",
            lessons.len(),
            rows.len()
        )));
    }

    lessons
        .into_iter()
        .zip(rows)
        .map(|(lesson, row)| -> Result<Mark> {
            let value = quarter_cell(row, quarter, &lesson)?;
            Ok(Mark::single(lesson, value, None))
        })
        .collect()
}

fn lessons(document: &Html, student_id: u64) -> Result<Vec<Lesson>> {
    let container_id = format!("daybook-last-page-container-{student_id}");
    let body = find_by_id(document, &CONTAINER_SELECTOR, &container_id)
        .and_then(|container| container.select(&TBODY_SELECTOR).next())
        .ok_or_else(|| {
            Error::malformed_page(format!("Lesson list `#{container_id}` not found"))
        })?;

    Ok(body
        .select(&LESSON_LINK_SELECTOR)
        .map(|link| Lesson {
            name: link.collapsed_text(),
            full_name: link.value().attr("title").map(str::to_string),
        })
        .collect())
}

fn quarter_cell(row: ElementRef, quarter: Quarter, lesson: &Lesson) -> Result<MarkValue> {
    let cell = row
        .select(&QUARTER_CELL_SELECTOR)
        .nth(quarter.index())
        .ok_or_else(|| {
            Error::malformed_page(format!(
                "No quarter {quarter} cell in the row of {}",
                lesson.name
            ))
        })?;
    Ok(MarkValue::from_token(&cell.text().collect::<String>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, test_utils::last_page};

    const STUDENT: u64 = 42;

    fn summary_html() -> String {
        last_page(
            STUDENT,
            &[
                ("Математика", "Математика (алгебра и геометрия)"),
                ("Физика", "Физика"),
                ("Труд", "Трудовое обучение"),
            ],
            &[["8", "9", "", ""], ["7", "", "", ""], ["зач", "", "", ""]],
        )
    }

    #[test]
    fn one_mark_per_lesson_for_the_quarter() {
        let quarter = Quarter::new(1).unwrap();
        let marks = parse_quarter_summary(&summary_html(), STUDENT, quarter).unwrap();
        assert_eq!(marks.len(), 3);
        assert_eq!(marks[0].lesson().name, "Математика");
        assert_eq!(
            marks[0].lesson().full_name.as_deref(),
            Some("Математика (алгебра и геометрия)")
        );
        assert_eq!(marks[0].value(), MarkValue::Numeric(8));
        assert_eq!(marks[1].value(), MarkValue::Numeric(7));
        assert_eq!(marks[2].value(), MarkValue::Raw("зач".to_string()));
        assert!(marks.iter().all(|mark| mark.date().is_none()));
    }

    #[test]
    fn empty_cell_is_absent() {
        let quarter = Quarter::new(2).unwrap();
        let marks = parse_quarter_summary(&summary_html(), STUDENT, quarter).unwrap();
        assert_eq!(marks[0].value(), MarkValue::Numeric(9));
        assert!(marks[1].value().is_absent());
        assert!(marks[2].value().is_absent());
    }

    #[test]
    fn mismatched_lengths_are_malformed() {
        let html = last_page(
            STUDENT,
            &[("Математика", "Математика"), ("Физика", "Физика")],
            &[["8", "", "", ""]],
        );
        let quarter = Quarter::new(1).unwrap();
        let err = parse_quarter_summary(&html, STUDENT, quarter).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPage);
    }

    #[test]
    fn missing_table_is_malformed() {
        let quarter = Quarter::new(1).unwrap();
        let err = parse_quarter_summary(&summary_html(), STUDENT + 1, quarter).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedPage);
    }

    #[test]
    fn lesson_list_keeps_titles() {
        let lessons = parse_lessons(&summary_html(), STUDENT).unwrap();
        assert_eq!(
            lessons,
            vec![
                Lesson::with_full_name("Математика", "Математика (алгебра и геометрия)"),
                Lesson::with_full_name("Физика", "Физика"),
                Lesson::with_full_name("Труд", "Трудовое обучение"),
            ]
        );
    }
}
