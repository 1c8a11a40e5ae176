use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error(
        "Authentication is required to access this video. Provide a browser name \
         (chrome, firefox, safari, edge) or an exported cookies file."
    )]
    AuthenticationRequired,

    #[error(
        "Could not read cookies from browser '{browser}': the cookie database was not found \
         or is not accessible. Export the cookies to a file and pass it as cookies_file \
         instead. Original error: {detail}"
    )]
    CookieSourceUnavailable { browser: String, detail: String },

    #[error("Caption download failed: {stderr}")]
    ToolFailed { stderr: String },

    #[error("No downloaded caption file found in {}", .0.display())]
    NoOutput(PathBuf),

    #[error("Caption downloader not found: {0}")]
    ToolNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetrievalError {
    /// Classify a failed downloader run from its stderr.
    pub fn from_stderr(stderr: &str, browser: Option<&str>) -> Self {
        let stderr = stderr.trim();

        if stderr.contains("Sign in to confirm you're not a bot") {
            return RetrievalError::AuthenticationRequired;
        }

        let lowered = stderr.to_lowercase();
        if let Some(browser) = browser {
            if lowered.contains("could not find") && lowered.contains("cookies database") {
                return RetrievalError::CookieSourceUnavailable {
                    browser: browser.to_string(),
                    detail: stderr.to_string(),
                };
            }
        }

        RetrievalError::ToolFailed {
            stderr: stderr.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_challenge_is_authentication() {
        let err = RetrievalError::from_stderr(
            "ERROR: [youtube] abc: Sign in to confirm you're not a bot. Use --cookies",
            None,
        );
        assert!(matches!(err, RetrievalError::AuthenticationRequired));
    }

    #[test]
    fn test_missing_cookie_database() {
        let err = RetrievalError::from_stderr(
            "ERROR: could not find chrome Cookies database in \"/home/u/.config/google-chrome\"",
            Some("chrome"),
        );
        match err {
            RetrievalError::CookieSourceUnavailable { browser, detail } => {
                assert_eq!(browser, "chrome");
                assert!(detail.contains("Cookies database"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_cookie_message_without_browser_is_generic() {
        let err = RetrievalError::from_stderr("could not find firefox cookies database", None);
        assert!(matches!(err, RetrievalError::ToolFailed { .. }));
    }

    #[test]
    fn test_other_failures_keep_stderr() {
        let err = RetrievalError::from_stderr("  ERROR: Unsupported URL: x  \n", None);
        assert_eq!(err.to_string(), "Caption download failed: ERROR: Unsupported URL: x");
    }
}
