use futures::{StreamExt as _, TryStreamExt as _, stream};

use crate::{
    error::{Error, Result},
    fetch::{GradebookPage, PageFetcher, QuarterId},
    gradebook::Gradebook,
    interval::{IntervalSource, Quarter, QuarterInterval},
    model::{DayEntries, DayEntry, LessonFilter, Mark},
    parse::{parse_quarter_summary, parse_week},
};

impl<F: PageFetcher> Gradebook<F> {
    /// Summary mark of every lesson for `quarter`.
    pub async fn get_quarters_marks(&self, quarter: Quarter) -> Result<Vec<Mark>> {
        let html = self.fetch(GradebookPage::LastPage).await?;
        parse_quarter_summary(&html, self.student_id, quarter)
    }

    /// Lessons and marks of every day on one week `page` of `quarter`.
    pub async fn get_all_data_from_page(
        &self,
        interval: &QuarterInterval,
        quarter: Quarter,
        page: u32,
        filter: Option<&LessonFilter>,
    ) -> Result<DayEntries> {
        interval.check_page(page)?;
        let quarter_id = self.get_quarter_id(quarter).await?;
        self.page_entries(quarter_id, interval, page, filter).await
    }

    /// Marks on one week `page` of `quarter`; lessons without a grade are dropped.
    pub async fn get_all_marks_from_page(
        &self,
        interval: &QuarterInterval,
        quarter: Quarter,
        page: u32,
        filter: Option<&LessonFilter>,
    ) -> Result<Vec<Mark>> {
        let entries = self
            .get_all_data_from_page(interval, quarter, page, filter)
            .await?;
        Ok(marks_of(entries))
    }

    /// Every mark of `quarter` in calendar order.
    ///
    /// Week pages are fetched concurrently, at most
    /// [`GradebookConfig::max_concurrent_pages`](crate::GradebookConfig) at a time.
    /// The first failing page fails the whole call.
    pub async fn get_all_marks<I: IntervalSource>(
        &self,
        intervals: &I,
        quarter: Quarter,
        filter: Option<&LessonFilter>,
    ) -> Result<Vec<Mark>> {
        let marks = self
            .quarter_pages(intervals, quarter, filter)
            .await?
            .into_iter()
            .flat_map(marks_of)
            .collect::<Vec<_>>();
        tracing::info!(%quarter, marks = marks.len(), "Collected quarter marks");
        Ok(marks)
    }

    /// Lessons and marks of every day of `quarter`.
    pub async fn get_all_data<I: IntervalSource>(
        &self,
        intervals: &I,
        quarter: Quarter,
        filter: Option<&LessonFilter>,
    ) -> Result<DayEntries> {
        Ok(self
            .quarter_pages(intervals, quarter, filter)
            .await?
            .into_iter()
            .flatten()
            .collect())
    }

    /// Per-page results of the whole quarter, in page order.
    async fn quarter_pages<I: IntervalSource>(
        &self,
        intervals: &I,
        quarter: Quarter,
        filter: Option<&LessonFilter>,
    ) -> Result<Vec<DayEntries>> {
        let intervals = intervals.intervals().await?;
        let interval = *intervals.interval(quarter)?;
        let pages = interval.pages_count();
        tracing::info!(%quarter, pages, "Crawling quarter");
        if pages == 0 {
            return Err(Error::invalid_argument(format!(
                "Quarter {quarter} has no pages"
            )));
        }

        let quarter_id = self.get_quarter_id(quarter).await?;
        // `buffered` yields in page order whatever order the fetches finish in.
        stream::iter(1..=pages)
            .map(|page| self.page_entries(quarter_id, &interval, page, filter))
            .buffered(self.config.concurrency())
            .try_collect()
            .await
    }

    #[tracing::instrument(level = tracing::Level::DEBUG, skip(self, interval, filter))]
    async fn page_entries(
        &self,
        quarter_id: QuarterId,
        interval: &QuarterInterval,
        page: u32,
        filter: Option<&LessonFilter>,
    ) -> Result<DayEntries> {
        let html = self
            .fetch(GradebookPage::Week {
                quarter_id,
                date: interval.page_start(page),
            })
            .await?;
        let days = parse_week(&html, filter)?;
        if days.len() > QuarterInterval::DAYS_PER_PAGE as usize {
            return Err(Error::malformed_page(format!(
                "Week page {page} has {} days",
                days.len()
            )));
        }

        let entries = days
            .into_iter()
            .zip(0..)
            .map(|(mut day, offset)| {
                let date = interval.page_date(page, offset);
                for entry in &mut day {
                    if let DayEntry::Mark(mark) = entry {
                        mark.set_date(date);
                    }
                }
                (date, day)
            })
            .collect::<DayEntries>();
        tracing::debug!(days = entries.len(), "Parsed week page");
        Ok(entries)
    }
}

fn marks_of(entries: DayEntries) -> Vec<Mark> {
    entries
        .into_values()
        .flatten()
        .filter_map(DayEntry::into_mark)
        .collect()
}
