use crate::{
    config::GradebookConfig,
    error::{Error, Result},
    fetch::{GradebookPage, HttpFetcher, PageFetcher, Session},
};

/// Gradebook of one student. Every network operation of the crate is a method on it.
pub struct Gradebook<F = HttpFetcher> {
    pub(crate) fetcher: F,
    pub(crate) student_id: u64,
    pub(crate) config: GradebookConfig,
}

impl Gradebook {
    pub fn new(session: Session, config: GradebookConfig) -> Result<Self> {
        let student_id = session.student_id;
        let fetcher = HttpFetcher::new(session, &config)?;
        Ok(Self::with_fetcher(fetcher, student_id, config))
    }
}

impl<F: PageFetcher> Gradebook<F> {
    pub fn with_fetcher(fetcher: F, student_id: u64, config: GradebookConfig) -> Self {
        Self {
            fetcher,
            student_id,
            config,
        }
    }

    pub fn student_id(&self) -> u64 {
        self.student_id
    }

    pub fn config(&self) -> &GradebookConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches `page`, giving up after the configured request timeout.
    pub(crate) async fn fetch(&self, page: GradebookPage) -> Result<String> {
        let timeout = self.config.request_timeout();
        tokio::time::timeout(timeout, self.fetcher.fetch(page))
            .await
            .map_err(|_| {
                Error::transport(format!(
                    "{} timed out after {timeout:?}",
                    page.path(self.student_id)
                ))
            })?
    }
}
