use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::{
    error::{Error, Result},
    fetch::QuarterId,
    interval::Quarter,
};

use super::ElementRefExt as _;

static MENU_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul[id]").expect("Failed to parse menu selector"));
static ENTRY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li a").expect("Failed to parse menu entry selector"));
static LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("Failed to parse label selector"));
static CURRENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.current").expect("Failed to parse current selector"));

const QUARTER_ID_ATTR: &str = "quarter_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentQuarter {
    pub quarter: Quarter,
    pub id: QuarterId,
}

/// Looks up the internal id of `quarter` in the quarter menu of the gradebook root.
/// `None` when the menu has no entry for it.
pub fn parse_quarter_id(
    html: &str,
    student_id: u64,
    quarter: Quarter,
) -> Result<Option<QuarterId>> {
    let document = Html::parse_document(html);
    let menu_id = format!("db_quarters_menu_{student_id}");
    let label = quarter.menu_label();

    document
        .select(&MENU_SELECTOR)
        .filter(|menu| menu.value().id() == Some(menu_id.as_str()))
        .flat_map(|menu| menu.select(&ENTRY_SELECTOR))
        .find(|entry| {
            entry
                .select(&LABEL_SELECTOR)
                .next()
                .is_some_and(|span| span.collapsed_text() == label)
        })
        .map(quarter_id)
        .transpose()
}

/// Reads the menu entry marked as current.
pub fn parse_current_quarter(html: &str) -> Result<CurrentQuarter> {
    let document = Html::parse_document(html);
    let current = document.select(&CURRENT_SELECTOR).next().ok_or_else(|| {
        Error::malformed_page("Current quarter entry `a.current` not found".to_string())
    })?;
    let text = current.collapsed_text();
    let number = text
        .split(' ')
        .next()
        .and_then(|number| number.parse::<u8>().ok())
        .ok_or_else(|| Error::malformed_page(format!("Cannot read quarter from `{text}`")))?;
    let quarter = Quarter::new(number)
        .map_err(|_| Error::malformed_page(format!("Quarter out of range in `{text}`")))?;
    Ok(CurrentQuarter {
        quarter,
        id: quarter_id(current)?,
    })
}

fn quarter_id(entry: ElementRef) -> Result<QuarterId> {
    let raw = entry.value().attr(QUARTER_ID_ATTR).ok_or_else(|| {
        Error::malformed_page(format!("Quarter entry has no `{QUARTER_ID_ATTR}` attribute"))
    })?;
    raw.trim()
        .parse()
        .map_err(|e| Error::malformed_page(format!("Invalid quarter id `{raw}`: {e}")))
}
