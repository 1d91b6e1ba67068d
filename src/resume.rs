//! Résumé extraction: pull the profile text out of an exported PDF.
//!
//! LinkedIn-style profile exports carry a free-text "Summary" section that
//! makes a good sidebar blurb. The input may be a local path or an HTTP(S)
//! URL; downloads land in a temporary directory that lives as long as the
//! returned handle.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::BlogError;

/// Section headings that terminate the summary, in document order of a
/// typical export.
const SUMMARY_STOP_MARKERS: [&str; 7] = [
    "Experience",
    "Education",
    "Certifications",
    "Skills",
    "Top Skills",
    "Languages",
    "Page 2",
];

/// Profile text extracted from a résumé PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeProfile {
    /// The "Summary" section, joined into flowing text, when present.
    pub summary: Option<String>,
    /// Full extracted text, control characters stripped.
    pub text: String,
}

/// A résumé input resolved to a local PDF file.
///
/// The `Downloaded` variant owns its temporary directory; dropping the value
/// deletes the file.
enum ResolvedResume {
    Local(PathBuf),
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedResume {
    fn path(&self) -> &Path {
        match self {
            ResolvedResume::Local(path) => path,
            ResolvedResume::Downloaded { path, .. } => path,
        }
    }
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn read_error(path: &Path, e: std::io::Error) -> BlogError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        BlogError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        BlogError::ExtractFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    }
}

fn check_pdf_magic(path: &Path) -> Result<(), BlogError> {
    let mut magic = [0u8; 4];
    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
    if bytes.len() >= 4 {
        magic.copy_from_slice(&bytes[..4]);
    }
    if &magic != b"%PDF" {
        return Err(BlogError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

async fn download_pdf(url: &str, timeout_secs: u64) -> Result<ResolvedResume, BlogError> {
    info!(url, "downloading résumé PDF");
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| BlogError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            BlogError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            BlogError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;
    if !response.status().is_success() {
        return Err(BlogError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }
    let bytes = response.bytes().await.map_err(|e| BlogError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let temp_dir = TempDir::new().map_err(|e| BlogError::DownloadFailed {
        url: url.to_string(),
        reason: format!("temp dir: {e}"),
    })?;
    let path = temp_dir.path().join("resume.pdf");
    std::fs::write(&path, &bytes).map_err(|e| BlogError::DownloadFailed {
        url: url.to_string(),
        reason: format!("write: {e}"),
    })?;
    debug!(bytes = bytes.len(), "résumé downloaded");
    Ok(ResolvedResume::Downloaded {
        path,
        _temp_dir: temp_dir,
    })
}

async fn resolve_resume(input: &str, timeout_secs: u64) -> Result<ResolvedResume, BlogError> {
    let resolved = if is_url(input) {
        download_pdf(input, timeout_secs).await?
    } else {
        let path = PathBuf::from(input);
        if !path.exists() {
            return Err(BlogError::ResumeNotFound { path });
        }
        ResolvedResume::Local(path)
    };
    check_pdf_magic(resolved.path())?;
    Ok(resolved)
}

/// Strip control characters, keeping newlines so section structure survives.
fn clean_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

/// Locate the "Summary" section in extracted PDF text and join it into
/// flowing text. The section ends at the earliest following stop marker
/// standing alone on a line.
fn parse_summary(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|l| l.trim() == "Summary")? + 1;

    let end = lines[start..]
        .iter()
        .position(|l| SUMMARY_STOP_MARKERS.contains(&l.trim()))
        .map(|i| start + i)
        .unwrap_or(lines.len());

    let summary = lines[start..end]
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if summary.is_empty() {
        None
    } else {
        Some(summary)
    }
}

/// Extract the profile from the résumé at `input` (local path or URL).
///
/// PDF parsing is CPU-bound, so it runs on the blocking thread pool.
pub async fn extract_profile(input: &str, timeout_secs: u64) -> Result<ResumeProfile, BlogError> {
    let resolved = resolve_resume(input, timeout_secs).await?;
    let path = resolved.path().to_path_buf();

    let raw = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&path).map_err(|e| BlogError::ExtractFailed {
            path: path.clone(),
            detail: e.to_string(),
        })
    })
    .await
    .map_err(|e| BlogError::Internal(format!("extraction task panicked: {e}")))??;

    let text = clean_text(&raw);
    let summary = parse_summary(&text);
    info!(
        chars = text.len(),
        has_summary = summary.is_some(),
        "résumé text extracted"
    );
    Ok(ResumeProfile { summary, text })
}
