//! Streaming build API: yields post results as they finish.
//!
//! Unlike [`crate::build`], the stream yields each [`PostResult`] as its
//! render completes (in completion order, not slug order) and writes no
//! index page, so a caller can drive its own progress display or stop early.

use std::pin::Pin;
use std::sync::Arc;

use futures::stream::{Stream, StreamExt};

use crate::build::render_one;
use crate::config::SiteConfig;
use crate::error::{BlogError, PostError};
use crate::output::PostResult;
use crate::pipeline::discover::{discover_posts, resolve_slugs};
use crate::pipeline::sanitize::Sanitizer;

/// A stream of per-post outcomes.
pub type PostStream = Pin<Box<dyn Stream<Item = Result<PostResult, PostError>> + Send>>;

/// Start a build and return a stream of per-post results.
///
/// Discovery and setup errors are returned immediately; per-post failures
/// arrive as `Err` items on the stream while the remaining posts continue.
pub async fn build_stream(config: &SiteConfig) -> Result<PostStream, BlogError> {
    let mut discovered = discover_posts(&config.source, &config.exclude_patterns)?;
    if discovered.is_empty() {
        return Err(BlogError::NoPostsFound {
            path: config.source.clone(),
        });
    }
    resolve_slugs(&mut discovered, config.flatten_slugs);

    let sanitizer = Arc::new(Sanitizer::new(&config.rules)?);
    for dir in [config.output.join("posts"), config.output.join("images")] {
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| BlogError::OutputWriteFailed { path: dir, source })?;
    }

    // The stream outlives this call, so each task owns its inputs.
    let config = Arc::new(config.clone());
    let output = Arc::new(config.output.clone());
    let concurrency = config.concurrency.max(1);

    let stream = futures::stream::iter(discovered)
        .map(move |post| {
            let sanitizer = Arc::clone(&sanitizer);
            let config = Arc::clone(&config);
            let output = Arc::clone(&output);
            async move {
                let mut result = render_one(&post, &sanitizer, &config, &output).await;
                match result.error.take() {
                    None => Ok(result),
                    Some(e) => Err(e),
                }
            }
        })
        .buffer_unordered(concurrency);

    Ok(Box::pin(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn stream_yields_every_post() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std::fs::write(src.path().join("blog-one.md"), "# One\n\ntext\n").unwrap();
        std::fs::write(src.path().join("blog-two.md"), "# Two\n\ntext\n").unwrap();

        let config = SiteConfig::builder(src.path())
            .output(out.path())
            .build()
            .unwrap();
        let mut stream = build_stream(&config).await.unwrap();

        let mut slugs = Vec::new();
        while let Some(item) = stream.next().await {
            slugs.push(item.unwrap().slug);
        }
        slugs.sort();
        assert_eq!(slugs, vec!["blog-one", "blog-two"]);
        assert!(out.path().join("posts/blog-one.html").exists());
        // The streaming API writes no index.
        assert!(!out.path().join("index.html").exists());
    }

    #[tokio::test]
    async fn empty_source_errors_before_streaming() {
        let src = TempDir::new().unwrap();
        let config = SiteConfig::builder(src.path()).build().unwrap();
        let err = build_stream(&config).await.err().unwrap();
        assert!(matches!(err, BlogError::NoPostsFound { .. }));
    }
}
