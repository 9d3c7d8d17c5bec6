//! Extraction of lessons and marks from gradebook markup.
//!
//! Parsing is synchronous and works on already fetched HTML.
mod menu;
mod summary;
mod week;

use scraper::{ElementRef, Html, Selector};

pub use menu::{CurrentQuarter, parse_current_quarter, parse_quarter_id};
pub use summary::{parse_lessons, parse_quarter_summary};
pub use week::parse_week;

pub(crate) trait ElementRefExt {
    /// All text of the element with runs of whitespace collapsed to one space.
    fn collapsed_text(&self) -> String;
}

impl ElementRefExt for ElementRef<'_> {
    fn collapsed_text(&self) -> String {
        collapse_whitespace(&self.text().collect::<String>())
    }
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First element matched by `selector` whose `id` is exactly `id`.
pub(crate) fn find_by_id<'a>(
    document: &'a Html,
    selector: &Selector,
    id: &str,
) -> Option<ElementRef<'a>> {
    document
        .select(selector)
        .find(|element| element.value().id() == Some(id))
}
