//! Error types for the notepress library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`BlogError`] — **Fatal**: the build cannot proceed at all (source
//!   directory missing, no eligible posts, bad configuration, résumé input
//!   unusable). Returned as `Err(BlogError)` from the top-level entry points.
//!
//! * [`PostError`] — **Non-fatal**: a single post failed (unreadable file,
//!   write glitch) but all other posts are fine. Stored inside
//!   [`crate::output::PostResult`] so callers can inspect partial success
//!   rather than losing the whole site to one bad note.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! post failure, log and continue, or collect all errors for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the notepress library.
///
/// Post-level failures use [`PostError`] and are stored in
/// [`crate::output::PostResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum BlogError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The source root does not exist or is not a directory.
    #[error("Source directory not found: {path:?}\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading {path:?}\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The source tree contains no blog-eligible Markdown files.
    #[error(
        "No blog-eligible Markdown files under {path:?}\n\
         Eligible files have 'blog' in their name and none of the exclusion patterns."
    )]
    NoPostsFound { path: PathBuf },

    // ── Résumé errors ─────────────────────────────────────────────────────
    /// Résumé input file was not found at the given path.
    #[error("Résumé PDF not found: {path:?}")]
    ResumeNotFound { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: {path:?}\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The PDF library could not extract any text from the document.
    #[error(
        "Text extraction failed for {path:?}: {detail}\n\
         Encrypted or scanned (image-only) PDFs cannot be extracted."
    )]
    ExtractFailed { path: PathBuf, detail: String },

    // ── Build errors ──────────────────────────────────────────────────────
    /// Every discovered post failed; no site would be produced.
    #[error("All {total} posts failed during the build.\nFirst error: {first_error}")]
    AllPostsFailed { total: usize, first_error: String },

    /// Some posts rendered but at least one failed.
    ///
    /// Returned by [`crate::output::BuildOutput::into_result`] when the caller
    /// wants to treat any post failure as an error.
    #[error("{failed}/{total} posts failed during the build")]
    PartialFailure {
        rendered: usize,
        failed: usize,
        total: usize,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write a file under the output root.
    #[error("Failed to write output file {path:?}: {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single post.
///
/// Stored alongside [`crate::output::PostResult`] when a post fails.
/// The overall build continues unless ALL posts fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PostError {
    /// The Markdown source could not be read.
    #[error("Post '{slug}': read failed: {detail}")]
    ReadFailed { slug: String, detail: String },

    /// The generated HTML page could not be written.
    #[error("Post '{slug}': write failed: {detail}")]
    WriteFailed { slug: String, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_display() {
        let e = BlogError::PartialFailure {
            rendered: 9,
            failed: 1,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("1/10"), "got: {msg}");
    }

    #[test]
    fn no_posts_display_names_path() {
        let e = BlogError::NoPostsFound {
            path: PathBuf::from("/notes"),
        };
        assert!(e.to_string().contains("/notes"));
    }

    #[test]
    fn download_timeout_display() {
        let e = BlogError::DownloadTimeout {
            url: "https://example.com/profile.pdf".into(),
            secs: 30,
        };
        assert!(e.to_string().contains("30s"));
        assert!(e.to_string().contains("profile.pdf"));
    }

    #[test]
    fn post_error_display_names_slug() {
        let e = PostError::ReadFailed {
            slug: "notes--aws-blog".into(),
            detail: "permission denied".into(),
        };
        assert!(e.to_string().contains("notes--aws-blog"));
        assert!(e.to_string().contains("permission denied"));
    }
}
