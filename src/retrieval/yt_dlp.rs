use anyhow::Result;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::process::Command;
use tracing::{debug, error, info, warn};
use which::which;

use super::{CaptionRetriever, CookieSource, RetrievalError, RetrievalRequest};
use crate::config::RetrievalConfig;

const DEFAULT_COMMAND: &str = "yt-dlp";
const CAPTION_EXTENSION: &str = "vtt";

/// Downloads caption tracks with `yt-dlp`, skipping the media itself.
pub struct YtDlpRetriever {
    command_path: Option<String>,
    subtitles_dir: PathBuf,
    cookies_dir: PathBuf,
}

impl YtDlpRetriever {
    pub fn new(command_path: Option<String>, subtitles_dir: PathBuf, cookies_dir: PathBuf) -> Self {
        Self {
            command_path,
            subtitles_dir,
            cookies_dir,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        Ok(Self::new(
            config.command_path.clone(),
            config.subtitles_dir()?,
            config.cookies_dir()?,
        ))
    }

    fn resolve_command(&self) -> Result<PathBuf, RetrievalError> {
        match &self.command_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => which(DEFAULT_COMMAND).map_err(|_| {
                RetrievalError::ToolNotFound(format!(
                    "{} is not installed or not on PATH",
                    DEFAULT_COMMAND
                ))
            }),
        }
    }

    /// Resolve a cookies file as given, then relative to the cookies directory.
    fn resolve_cookie_file(&self, file: &Path) -> Option<PathBuf> {
        if file.exists() {
            return Some(file.to_path_buf());
        }
        let in_cookies_dir = self.cookies_dir.join(file);
        if in_cookies_dir.exists() {
            return Some(in_cookies_dir);
        }
        warn!(
            "Cookies file {:?} not found, downloading without cookies",
            file
        );
        None
    }

    fn build_args(&self, request: &RetrievalRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--write-auto-sub".into(),
            "--write-sub".into(),
            format!("--sub-lang={}", request.language).into(),
            "--skip-download".into(),
            format!("--sub-format={}", CAPTION_EXTENSION).into(),
            "-o".into(),
            self.subtitles_dir.join("%(title)s.%(ext)s").into_os_string(),
        ];

        match &request.cookies {
            CookieSource::Browser(browser) => {
                args.push("--cookies-from-browser".into());
                args.push(browser.into());
            }
            CookieSource::File(file) => {
                if let Some(path) = self.resolve_cookie_file(file) {
                    args.push("--cookies".into());
                    args.push(path.into_os_string());
                }
            }
            CookieSource::None => {}
        }

        args.push(request.url.clone().into());
        args
    }
}

#[async_trait]
impl CaptionRetriever for YtDlpRetriever {
    async fn retrieve(&self, request: &RetrievalRequest) -> Result<PathBuf, RetrievalError> {
        let command = self.resolve_command()?;
        tokio::fs::create_dir_all(&self.subtitles_dir).await?;

        let args = self.build_args(request);
        info!(
            "Downloading {} captions for {} via {:?}",
            request.language, request.url, command
        );
        debug!("Downloader arguments: {:?}", args);

        let output = Command::new(&command)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    RetrievalError::ToolNotFound(command.display().to_string())
                } else {
                    RetrievalError::Io(e)
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                "Caption download exited with status {}: {}",
                output.status,
                stderr.trim()
            );
            return Err(RetrievalError::from_stderr(
                &stderr,
                request.cookies.browser(),
            ));
        }

        let caption_file = latest_caption_file(&self.subtitles_dir)
            .await?
            .ok_or_else(|| RetrievalError::NoOutput(self.subtitles_dir.clone()))?;

        info!("Caption track saved to {:?}", caption_file);
        Ok(caption_file)
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

/// Most recently created caption file in `dir`, if any.
async fn latest_caption_file(dir: &Path) -> Result<Option<PathBuf>, RetrievalError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut latest: Option<(SystemTime, PathBuf)> = None;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_caption = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(CAPTION_EXTENSION))
            .unwrap_or(false);
        if !is_caption {
            continue;
        }

        let metadata = entry.metadata().await?;
        let stamp = metadata
            .created()
            .or_else(|_| metadata.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        if latest.as_ref().map_or(true, |(newest, _)| stamp >= *newest) {
            latest = Some((stamp, path));
        }
    }

    Ok(latest.map(|(_, path)| path))
}
