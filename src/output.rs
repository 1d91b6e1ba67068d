//! Build results: per-post outcomes and aggregate statistics.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BlogError, PostError};
use crate::pipeline::sanitize::SanitizeReport;

/// Outcome of rendering a single post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResult {
    /// Stable identifier, also the output filename stem.
    pub slug: String,
    /// Title shown on the post page and the index card.
    pub title: String,
    /// First paragraph of body text, for the index card.
    pub teaser: String,
    /// Category key assigned from the source path.
    pub category: String,
    /// Source note this post was rendered from.
    pub source: PathBuf,
    /// Length of the generated HTML page in bytes (0 on failure).
    pub html_len: usize,
    /// Redaction counts for this post.
    pub report: SanitizeReport,
    /// Number of local images copied alongside the post.
    pub images_copied: usize,
    /// Set when the post failed; the build continues without it.
    pub error: Option<PostError>,
}

impl PostResult {
    /// True when the post rendered and was written successfully.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregate statistics for one build.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    /// Eligible notes found during discovery.
    pub discovered_posts: usize,
    /// Posts rendered and written successfully.
    pub rendered_posts: usize,
    /// Posts that failed to read or write.
    pub failed_posts: usize,
    /// Distinct categories among rendered posts.
    pub categories: usize,
    /// Local images copied into the output tree.
    pub images_copied: usize,
    /// Redaction counts summed across all posts.
    pub redactions: SanitizeReport,
    /// Wall-clock duration of the whole build in milliseconds.
    pub total_duration_ms: u64,
    /// Time spent walking the source tree and assigning slugs.
    pub discover_duration_ms: u64,
    /// Time spent rendering posts (discovery and index excluded).
    pub render_duration_ms: u64,
}

/// Everything a build produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOutput {
    /// One entry per discovered post, ordered by slug.
    pub posts: Vec<PostResult>,
    /// Aggregate statistics.
    pub stats: BuildStats,
    /// Path of the generated index page.
    pub index_path: PathBuf,
}

impl BuildOutput {
    /// Convert a build with failures into an error, for callers that treat
    /// any failed post as fatal.
    pub fn into_result(self) -> Result<BuildOutput, BlogError> {
        if self.stats.failed_posts > 0 {
            return Err(BlogError::PartialFailure {
                rendered: self.stats.rendered_posts,
                failed: self.stats.failed_posts,
                total: self.stats.discovered_posts,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_post(slug: &str) -> PostResult {
        PostResult {
            slug: slug.to_string(),
            title: "Title".to_string(),
            teaser: String::new(),
            category: "other".to_string(),
            source: PathBuf::from("notes/a.md"),
            html_len: 1024,
            report: SanitizeReport::default(),
            images_copied: 0,
            error: None,
        }
    }

    #[test]
    fn into_result_passes_clean_builds() {
        let output = BuildOutput {
            posts: vec![ok_post("a")],
            stats: BuildStats {
                discovered_posts: 1,
                rendered_posts: 1,
                ..BuildStats::default()
            },
            index_path: PathBuf::from("blog/index.html"),
        };
        assert!(output.into_result().is_ok());
    }

    #[test]
    fn into_result_rejects_partial_failures() {
        let output = BuildOutput {
            posts: vec![ok_post("a")],
            stats: BuildStats {
                discovered_posts: 2,
                rendered_posts: 1,
                failed_posts: 1,
                ..BuildStats::default()
            },
            index_path: PathBuf::from("blog/index.html"),
        };
        match output.into_result() {
            Err(BlogError::PartialFailure {
                rendered, failed, ..
            }) => {
                assert_eq!(rendered, 1);
                assert_eq!(failed, 1);
            }
            other => panic!("expected PartialFailure, got {other:?}"),
        }
    }

    #[test]
    fn build_output_round_trips_through_json() {
        let output = BuildOutput {
            posts: vec![ok_post("a")],
            stats: BuildStats::default(),
            index_path: PathBuf::from("blog/index.html"),
        };
        let json = serde_json::to_string(&output).unwrap();
        let back: BuildOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.posts[0].slug, "a");
        assert!(back.posts[0].is_ok());
    }
}
