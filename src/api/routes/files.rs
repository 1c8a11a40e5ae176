//! File download routes.
//!
//! Serves caption tracks and generated summaries out of the subtitles
//! directory as attachments.

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::path::{Component, Path};
use tracing::info;

/// Query parameters for file downloads.
#[derive(Debug, Deserialize, Default)]
pub struct FileQueryParams {
    /// File name inside the subtitles directory
    pub file: Option<String>,
}

/// Create the file download router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/download-markdown", get(download_markdown))
        .with_state(state)
}

/// GET /download-markdown?file= - Download a file from the subtitles directory.
async fn download_markdown(
    State(state): State<AppState>,
    Query(params): Query<FileQueryParams>,
) -> ApiResult<Response> {
    let name = params
        .file
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing file parameter"))?;

    if !is_plain_file_name(&name) {
        return Err(ApiError::bad_request(format!("Invalid file name: {}", name)));
    }

    let path = state.subtitles_dir.join(&name);
    if !path.is_file() {
        return Err(ApiError::not_found(format!("File {} not found", name)));
    }

    info!("Serving {:?}", path);
    attachment(&path).await
}

/// A single normal path component, so lookups cannot leave the directory.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains('\\')
}

/// Read a file and return it as a download.
pub async fn attachment(path: &Path) -> ApiResult<Response> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read {}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());

    let headers = [
        (header::CONTENT_TYPE, content_type_for(path).to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
    ];

    Ok((headers, content).into_response())
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("md") => "text/markdown; charset=utf-8",
        Some("vtt") => "text/vtt; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// `attachment` disposition with an ASCII fallback name and an RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::new();
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("talk.en_summary.md"));
        assert!(is_plain_file_name("My Talk.en.vtt"));
        assert!(!is_plain_file_name("../config.toml"));
        assert!(!is_plain_file_name("nested/file.md"));
        assert!(!is_plain_file_name("/etc/passwd"));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("..\\secret"));
    }

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("a b.md"),
            "attachment; filename=\"a b.md\"; filename*=UTF-8''a%20b.md"
        );
    }

    #[test]
    fn test_content_disposition_unicode() {
        let value = content_disposition("字幕.md");
        assert!(value.starts_with("attachment; filename=\"__.md\""));
        assert!(value.ends_with("filename*=UTF-8''%E5%AD%97%E5%B9%95.md"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(
            content_type_for(Path::new("x_summary.md")),
            "text/markdown; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("x.bin")), "application/octet-stream");
    }
}
