//! Fixture markup and an in-memory portal for tests.
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

use time::Date;

use crate::{
    error::{Error, Result},
    fetch::{GradebookPage, PageFetcher},
};

/// Week page with one `div.db_day` per entry of `days`; each row is
/// `(lesson cell text, mark box text)`.
pub(crate) fn week_page(days: &[&[(&str, &str)]]) -> String {
    let days = days
        .iter()
        .map(|rows| {
            let rows = rows
                .iter()
                .map(|(lesson, mark)| {
                    format!(
                        r#"<tr><td class="lesson">{lesson}</td><td class="mark"><div class="mark_box">{mark}</div></td></tr>"#
                    )
                })
                .collect::<String>();
            format!(r#"<div class="db_day"><table><tbody>{rows}</tbody></table></div>"#)
        })
        .collect::<String>();
    format!(
        r#"<html><body>
        <div class="db_days clearfix"><div class="db_day"><table><tbody></tbody></table></div></div>
        <div class="db_days clearfix">{days}</div>
        </body></html>"#
    )
}

/// Gradebook root with a quarter menu; entries are `(ordinal, quarter id, current)`.
pub(crate) fn menu_page(student_id: u64, entries: &[(u8, u64, bool)]) -> String {
    let items = entries
        .iter()
        .map(|(number, id, current)| {
            let class = if *current { r#" class="current""# } else { "" };
            format!(r#"<li><a href="/"{class} quarter_id="{id}"><span>{number} четверть</span></a></li>"#)
        })
        .collect::<String>();
    format!(
        r#"<html><body><ul id="db_quarters_menu_{student_id}">{items}</ul></body></html>"#
    )
}

/// Last page with a lesson list `(name, title)` and a parallel grade table.
pub(crate) fn last_page(
    student_id: u64,
    lessons: &[(&str, &str)],
    marks: &[[&str; 4]],
) -> String {
    let links = lessons
        .iter()
        .map(|(name, title)| {
            format!(r#"<tr><td><a href="/" title="{title}">{name}</a></td></tr>"#)
        })
        .collect::<String>();
    let rows = marks
        .iter()
        .map(|cells| {
            let cells = cells
                .iter()
                .map(|cell| format!(r#"<td class="qmark">{cell}</td>"#))
                .collect::<String>();
            format!(r#"<tr class="marks">{cells}<td class="ymark"></td></tr>"#)
        })
        .collect::<String>();
    format!(
        r#"<html><body>
        <div id="daybook-last-page-container-{student_id}"><table><tbody>{links}</tbody></table></div>
        <table id="daybook-last-page-table-{student_id}"><tbody>{rows}</tbody></table>
        </body></html>"#
    )
}

/// Serves fixture pages. Weeks can be delayed or made to fail.
#[derive(Default)]
pub(crate) struct MockPortal {
    root: String,
    last_page: String,
    weeks: HashMap<Date, String>,
    delays: HashMap<Date, Duration>,
    failing: HashSet<Date>,
    requests: Mutex<Vec<GradebookPage>>,
    completed: Mutex<Vec<Date>>,
}

impl MockPortal {
    pub(crate) fn new(root: String) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub(crate) fn with_last_page(mut self, html: String) -> Self {
        self.last_page = html;
        self
    }

    pub(crate) fn with_week(mut self, date: Date, html: String) -> Self {
        self.weeks.insert(date, html);
        self
    }

    pub(crate) fn with_delay(mut self, date: Date, delay: Duration) -> Self {
        self.delays.insert(date, delay);
        self
    }

    pub(crate) fn failing_on(mut self, date: Date) -> Self {
        self.failing.insert(date);
        self
    }

    pub(crate) fn requests(&self) -> Vec<GradebookPage> {
        self.requests.lock().unwrap().clone()
    }

    /// Week start dates in the order their fetches finished.
    pub(crate) fn completed(&self) -> Vec<Date> {
        self.completed.lock().unwrap().clone()
    }
}

impl PageFetcher for MockPortal {
    async fn fetch(&self, page: GradebookPage) -> Result<String> {
        self.requests.lock().unwrap().push(page);
        match page {
            GradebookPage::Root => Ok(self.root.clone()),
            GradebookPage::LastPage => Ok(self.last_page.clone()),
            GradebookPage::Week { date, .. } => {
                if let Some(delay) = self.delays.get(&date) {
                    tokio::time::sleep(*delay).await;
                }
                if self.failing.contains(&date) {
                    return Err(Error::transport(format!("Connection reset for week {date}")));
                }
                self.completed.lock().unwrap().push(date);
                self.weeks
                    .get(&date)
                    .cloned()
                    .ok_or_else(|| Error::transport(format!("No week page for {date}")))
            }
        }
    }
}
