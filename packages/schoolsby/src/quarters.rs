use crate::{
    error::{Error, Result},
    fetch::{GradebookPage, PageFetcher, QuarterId},
    gradebook::Gradebook,
    interval::Quarter,
    parse::{CurrentQuarter, parse_current_quarter, parse_quarter_id},
};

impl<F: PageFetcher> Gradebook<F> {
    /// Internal id of `quarter`. Fails with an `UnresolvedQuarter` error when the
    /// portal has no menu entry for it yet.
    pub async fn get_quarter_id(&self, quarter: Quarter) -> Result<QuarterId> {
        let html = self.fetch(GradebookPage::Root).await?;
        let id = parse_quarter_id(&html, self.student_id, quarter)?
            .ok_or_else(|| Error::unresolved_quarter(quarter))?;
        tracing::debug!(%quarter, id, "Resolved quarter id");
        Ok(id)
    }

    pub async fn get_current_quarter(&self) -> Result<Quarter> {
        Ok(self.current_quarter().await?.quarter)
    }

    pub async fn get_current_quarter_full(&self) -> Result<QuarterId> {
        Ok(self.current_quarter().await?.id)
    }

    pub async fn current_quarter(&self) -> Result<CurrentQuarter> {
        let html = self.fetch(GradebookPage::Root).await?;
        parse_current_quarter(&html)
    }
}
