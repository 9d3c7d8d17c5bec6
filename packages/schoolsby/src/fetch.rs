use std::{future::Future, sync::Arc};

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue};
use time::Date;
use url::Url;

use crate::{
    config::GradebookConfig,
    error::{Error, Result},
};

pub(crate) const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Portal-internal quarter identifier, as found in the `quarter_id` attribute.
pub type QuarterId = u64;

/// Authenticated portal session produced by the login flow.
#[derive(Debug, Clone)]
pub struct Session {
    /// Personal portal root, e.g. `https://gymn1.schools.by`.
    pub base_url: Url,
    pub student_id: u64,
    pub user_agent: String,
    pub csrf_token: String,
    pub session_id: String,
}

impl Session {
    pub fn new(
        base_url: Url,
        student_id: u64,
        csrf_token: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url,
            student_id,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            csrf_token: csrf_token.into(),
            session_id: session_id.into(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reads `SCHOOLSBY_URL`, `SCHOOLSBY_STUDENT_ID`, `SCHOOLSBY_CSRF_TOKEN`,
    /// `SCHOOLSBY_SESSION_ID` and, optionally, `SCHOOLSBY_USER_AGENT`.
    pub fn from_env() -> Result<Self> {
        let base_url = Url::parse(&env_var("SCHOOLSBY_URL")?)?;
        let student_id = env_var("SCHOOLSBY_STUDENT_ID")?
            .parse::<u64>()
            .map_err(|e| Error::invalid_argument(format!("Invalid SCHOOLSBY_STUDENT_ID: {e}")))?;
        let session = Self::new(
            base_url,
            student_id,
            env_var("SCHOOLSBY_CSRF_TOKEN")?,
            env_var("SCHOOLSBY_SESSION_ID")?,
        );
        Ok(match std::env::var("SCHOOLSBY_USER_AGENT") {
            Ok(user_agent) if !user_agent.is_empty() => session.with_user_agent(user_agent),
            _ => session,
        })
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|e| Error::invalid_argument(format!("{key}: {e}")))
}

/// Gradebook views the crawler reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradebookPage {
    /// Gradebook root, carries the quarter menu.
    Root,
    /// Quarter summary table.
    LastPage,
    /// One week of a quarter, starting at `date`.
    Week { quarter_id: QuarterId, date: Date },
}

impl GradebookPage {
    pub fn path(&self, student_id: u64) -> String {
        let root = format!("/pupil/{student_id}/dnevnik");
        match self {
            GradebookPage::Root => root,
            GradebookPage::LastPage => format!("{root}/last-page"),
            GradebookPage::Week { quarter_id, date } => {
                format!("{root}/quarter/{quarter_id}/week/{date}")
            }
        }
    }
}

/// Fetches the raw markup of a gradebook page.
pub trait PageFetcher {
    fn fetch(&self, page: GradebookPage) -> impl Future<Output = Result<String>> + Send;
}

/// [`PageFetcher`] over HTTP with the session cookies.
pub struct HttpFetcher {
    session: Session,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(session: Session, config: &GradebookConfig) -> Result<Self> {
        let jar = Arc::new(reqwest::cookie::Jar::default());
        jar.add_cookie_str(
            &format!("csrftoken={}; Path=/", session.csrf_token),
            &session.base_url,
        );
        jar.add_cookie_str(
            &format!("sessionid={}; Path=/", session.session_id),
            &session.base_url,
        );
        let client = reqwest::Client::builder()
            .cookie_provider(jar)
            .user_agent(session.user_agent.as_str())
            .default_headers(default_header())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { session, client })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, page: GradebookPage) -> Result<String> {
        let url = self
            .session
            .base_url
            .join(&page.path(self.session.student_id))?;
        tracing::debug!(%url, "Fetching gradebook page");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(format!("{url} responded with {status}")));
        }
        Ok(response.text().await?)
    }
}

fn default_header() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ru,be;q=0.9,en;q=0.8"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}
