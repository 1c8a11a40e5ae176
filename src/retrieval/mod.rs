//! Caption retrieval through an external downloader.
//!
//! The pipeline only depends on the [`CaptionRetriever`] trait; the default
//! implementation shells out to `yt-dlp`.

mod error;
mod yt_dlp;

use async_trait::async_trait;
use std::path::PathBuf;

pub use error::RetrievalError;
pub use yt_dlp::YtDlpRetriever;

/// Where the downloader should take authentication cookies from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CookieSource {
    #[default]
    None,
    /// Read cookies straight out of a local browser profile (chrome, firefox, ...)
    Browser(String),
    /// Netscape-format cookies file exported from a browser
    File(PathBuf),
}

impl CookieSource {
    /// Build from request options. A browser takes precedence over a cookies file.
    pub fn from_options(browser: Option<String>, cookies_file: Option<String>) -> Self {
        let browser = browser.filter(|b| !b.trim().is_empty());
        let cookies_file = cookies_file.filter(|f| !f.trim().is_empty());

        match (browser, cookies_file) {
            (Some(browser), _) => CookieSource::Browser(browser),
            (None, Some(file)) => CookieSource::File(PathBuf::from(file)),
            (None, None) => CookieSource::None,
        }
    }

    pub fn browser(&self) -> Option<&str> {
        match self {
            CookieSource::Browser(name) => Some(name),
            _ => None,
        }
    }
}

/// A single caption download.
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    pub url: String,
    pub language: String,
    pub cookies: CookieSource,
}

impl RetrievalRequest {
    pub fn new(url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            language: language.into(),
            cookies: CookieSource::None,
        }
    }

    pub fn with_cookies(mut self, cookies: CookieSource) -> Self {
        self.cookies = cookies;
        self
    }
}

/// Downloads a caption track and returns the path of the written file.
#[async_trait]
pub trait CaptionRetriever: Send + Sync {
    async fn retrieve(&self, request: &RetrievalRequest) -> Result<PathBuf, RetrievalError>;

    fn name(&self) -> &'static str;
}
