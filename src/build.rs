//! Build orchestration: discovery, concurrent rendering, index generation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::SiteConfig;
use crate::error::{BlogError, PostError};
use crate::output::{BuildOutput, BuildStats, PostResult};
use crate::pipeline::categorize::{category_label, pick_category};
use crate::pipeline::discover::{discover_posts, resolve_slugs, DiscoveredPost};
use crate::pipeline::images::rewrite_images;
use crate::pipeline::markdown::{extract_teaser, extract_title, render_markdown};
use crate::pipeline::sanitize::{SanitizeReport, Sanitizer};
use crate::site::index::index_page;
use crate::site::post::post_page;

/// Teaser length on index cards, in characters.
const TEASER_MAX_CHARS: usize = 220;

/// Write `contents` to `path` atomically: write a sibling temp file, then
/// rename over the target, so a crash never leaves a half-written page.
async fn write_atomic(path: &Path, contents: &str) -> Result<(), std::io::Error> {
    let tmp = path.with_extension("html.tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}

/// Render one discovered note into a post page under `posts_dir`.
///
/// Never returns an error: failures are captured in the result's `error`
/// field so one bad note does not sink the build.
async fn render_post(
    post: &DiscoveredPost,
    sanitizer: &Sanitizer,
    config: &SiteConfig,
    posts_dir: &Path,
    images_root: &Path,
) -> PostResult {
    let mut result = PostResult {
        slug: post.slug.clone(),
        title: String::new(),
        teaser: String::new(),
        category: String::new(),
        source: post.path.clone(),
        html_len: 0,
        report: SanitizeReport::default(),
        images_copied: 0,
        error: None,
    };

    let raw = match tokio::fs::read_to_string(&post.path).await {
        Ok(raw) => raw,
        Err(e) => {
            result.error = Some(PostError::ReadFailed {
                slug: post.slug.clone(),
                detail: e.to_string(),
            });
            return result;
        }
    };

    let (sanitized, report) = sanitizer.sanitize(&raw);
    result.report = report;

    let post_dir = post.path.parent().unwrap_or(Path::new("."));
    let rewritten = rewrite_images(&sanitized, post_dir, images_root, &post.slug);
    result.images_copied = rewritten.copied;

    // Metadata comes from the sanitized text so a scrubbed term can never
    // resurface in a title or teaser.
    let stem = post
        .rel
        .rsplit('/')
        .next()
        .unwrap_or(&post.rel)
        .trim_end_matches(".md");
    result.title = extract_title(&rewritten.markdown, stem);
    result.teaser = extract_teaser(&rewritten.markdown, TEASER_MAX_CHARS);
    result.category = pick_category(&post.rel, &config.extra_categories);

    let body_html = render_markdown(&rewritten.markdown);
    let page = post_page(
        &config.site_title,
        config.about.as_deref(),
        &result.title,
        &result.teaser,
        &category_label(&result.category),
        &body_html,
    );
    result.html_len = page.len();

    let out_path = posts_dir.join(format!("{}.html", post.slug));
    if let Err(e) = write_atomic(&out_path, &page).await {
        result.error = Some(PostError::WriteFailed {
            slug: post.slug.clone(),
            detail: e.to_string(),
        });
        result.html_len = 0;
        return result;
    }

    debug!(slug = %post.slug, bytes = result.html_len, "post rendered");
    result
}

/// Build the whole site described by `config`.
///
/// Posts render concurrently (`config.concurrency` at a time); the index is
/// written last, listing only posts that rendered. Per-post failures are
/// reported in the output rather than returned as errors; the build fails
/// only when nothing at all could be rendered.
pub async fn build(config: &SiteConfig) -> Result<BuildOutput, BlogError> {
    let build_start = Instant::now();

    let mut discovered = discover_posts(&config.source, &config.exclude_patterns)?;
    if discovered.is_empty() {
        return Err(BlogError::NoPostsFound {
            path: config.source.clone(),
        });
    }
    resolve_slugs(&mut discovered, config.flatten_slugs);
    let discover_duration_ms = build_start.elapsed().as_millis() as u64;
    let total = discovered.len();
    info!(posts = total, source = %config.source.display(), "starting build");

    let sanitizer = Arc::new(Sanitizer::new(&config.rules)?);
    let posts_dir = config.output.join("posts");
    let images_root = config.output.join("images");
    for dir in [&posts_dir, &images_root] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| BlogError::OutputWriteFailed {
                path: dir.clone(),
                source,
            })?;
    }

    if let Some(cb) = &config.progress_callback {
        cb.on_build_start(total);
    }

    let render_start = Instant::now();
    let mut posts: Vec<PostResult> = stream::iter(discovered.iter().enumerate())
        .map(|(i, post)| {
            let sanitizer = Arc::clone(&sanitizer);
            let posts_dir = posts_dir.clone();
            let images_root = images_root.clone();
            async move {
                let post_num = i + 1;
                if let Some(cb) = &config.progress_callback {
                    cb.on_post_start(post_num, total);
                }
                let result = render_post(post, &sanitizer, config, &posts_dir, &images_root).await;
                if let Some(cb) = &config.progress_callback {
                    match &result.error {
                        None => cb.on_post_complete(post_num, total, result.html_len),
                        Some(e) => cb.on_post_error(post_num, total, e.to_string()),
                    }
                }
                result
            }
        })
        // Direct struct construction can bypass the builder's clamp; a zero
        // here would start no futures and stall forever.
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;

    posts.sort_by(|a, b| a.slug.cmp(&b.slug));
    let rendered: Vec<&PostResult> = posts.iter().filter(|p| p.is_ok()).collect();
    if rendered.is_empty() {
        let first_error = posts
            .iter()
            .find_map(|p| p.error.as_ref().map(|e| e.to_string()))
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(BlogError::AllPostsFailed { total, first_error });
    }
    for post in posts.iter().filter(|p| !p.is_ok()) {
        warn!(slug = %post.slug, error = ?post.error, "post failed");
    }

    let index = index_page(&config.site_title, config.about.as_deref(), &rendered);
    let index_path = config.output.join("index.html");
    write_atomic(&index_path, &index)
        .await
        .map_err(|source| BlogError::OutputWriteFailed {
            path: index_path.clone(),
            source,
        })?;

    let mut stats = BuildStats {
        discovered_posts: total,
        rendered_posts: rendered.len(),
        failed_posts: total - rendered.len(),
        discover_duration_ms,
        render_duration_ms,
        ..BuildStats::default()
    };
    let mut categories: Vec<&str> = rendered.iter().map(|p| p.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();
    stats.categories = categories.len();
    for post in &posts {
        stats.redactions.merge(&post.report);
        stats.images_copied += post.images_copied;
    }
    stats.total_duration_ms = build_start.elapsed().as_millis() as u64;

    if let Some(cb) = &config.progress_callback {
        cb.on_build_complete(total, stats.rendered_posts);
    }
    info!(
        rendered = stats.rendered_posts,
        failed = stats.failed_posts,
        ms = stats.total_duration_ms,
        "build complete"
    );

    Ok(BuildOutput {
        posts,
        stats,
        index_path,
    })
}

/// Blocking wrapper around [`build`] for synchronous callers.
pub fn build_sync(config: &SiteConfig) -> Result<BuildOutput, BlogError> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| BlogError::Internal(format!("failed to create runtime: {e}")))?;
    runtime.block_on(build(config))
}

/// Render a single discovered note. Used by the streaming API.
pub(crate) async fn render_one(
    post: &DiscoveredPost,
    sanitizer: &Sanitizer,
    config: &SiteConfig,
    output: &PathBuf,
) -> PostResult {
    let posts_dir = output.join("posts");
    let images_root = output.join("images");
    render_post(post, sanitizer, config, &posts_dir, &images_root).await
}
