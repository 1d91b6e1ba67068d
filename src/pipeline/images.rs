//! Image handling: rewrite local image references in a post and copy the
//! referenced files into the output tree.
//!
//! Remote references (`http:`, `https:`, `data:`) pass through untouched.
//! Local references are rewritten to `../images/<slug>/<filename>` so the
//! generated `posts/` pages find them, and the files are copied under the
//! shared images root. Copy failures are logged and skipped; a missing
//! screenshot is never worth failing the whole post.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use tracing::warn;

static RE_MD_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(!\[[^\]]*\]\()([^)]+)(\))").unwrap());

static RE_HTML_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(<img[^>]+src=["'])([^"']+)(["'])"#).unwrap());

/// Result of [`rewrite_images`].
#[derive(Debug)]
pub struct ImageRewrite {
    /// Markdown with local image references rewritten.
    pub markdown: String,
    /// Number of image files copied into the output tree.
    pub copied: usize,
}

fn is_remote(src: &str) -> bool {
    let lower = src.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
}

/// Rewrite both Markdown and inline-HTML image references in `markdown`.
///
/// `post_dir` is the directory of the source note (local references resolve
/// against it); `images_root` is `<output>/images`.
pub fn rewrite_images(
    markdown: &str,
    post_dir: &Path,
    images_root: &Path,
    slug: &str,
) -> ImageRewrite {
    let mut copied = 0usize;

    let rewrite = |pre: &str, src: &str, post: &str, copied: &mut usize| -> String {
        if is_remote(src) {
            return format!("{pre}{src}{post}");
        }
        let source_path = post_dir.join(src.trim());
        let filename = match source_path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_string(),
            None => return format!("{pre}{src}{post}"),
        };
        if !source_path.is_file() {
            warn!(src = %source_path.display(), "referenced image not found");
            return format!("{pre}{src}{post}");
        }
        let dest_dir = images_root.join(slug);
        let dest = dest_dir.join(&filename);
        let result =
            std::fs::create_dir_all(&dest_dir).and_then(|_| std::fs::copy(&source_path, &dest));
        match result {
            Ok(_) => *copied += 1,
            Err(e) => {
                warn!(src = %source_path.display(), error = %e, "image copy failed");
            }
        }
        format!("{pre}../images/{slug}/{filename}{post}")
    };

    let pass1 = RE_MD_IMAGE.replace_all(markdown, |caps: &regex::Captures<'_>| {
        rewrite(&caps[1], &caps[2], &caps[3], &mut copied)
    });
    let pass2 = RE_HTML_IMAGE.replace_all(&pass1, |caps: &regex::Captures<'_>| {
        rewrite(&caps[1], &caps[2], &caps[3], &mut copied)
    });

    ImageRewrite {
        markdown: pass2.into_owned(),
        copied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn remote_references_are_untouched() {
        let dir = TempDir::new().unwrap();
        let md = "![a](https://cdn.example/a.png) <img src=\"data:image/png;base64,xx\">";
        let out = rewrite_images(md, dir.path(), dir.path(), "post");
        assert_eq!(out.markdown, md);
        assert_eq!(out.copied, 0);
    }

    #[test]
    fn local_markdown_image_is_copied_and_rewritten() {
        let src = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::write(src.path().join("diagram.png"), b"png").unwrap();

        let out = rewrite_images("![d](diagram.png)", src.path(), out_dir.path(), "my-post");
        assert_eq!(out.markdown, "![d](../images/my-post/diagram.png)");
        assert_eq!(out.copied, 1);
        assert!(out_dir.path().join("my-post/diagram.png").is_file());
    }

    #[test]
    fn html_img_tags_are_rewritten() {
        let src = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::write(src.path().join("shot.jpg"), b"jpg").unwrap();

        let out = rewrite_images(
            "<IMG src='shot.jpg' alt=\"x\">",
            src.path(),
            out_dir.path(),
            "p",
        );
        assert_eq!(out.markdown, "<IMG src='../images/p/shot.jpg' alt=\"x\">");
        assert_eq!(out.copied, 1);
    }

    #[test]
    fn missing_image_leaves_reference_unchanged() {
        let src = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();

        let out = rewrite_images("![m](gone.png)", src.path(), out_dir.path(), "p");
        assert_eq!(out.markdown, "![m](gone.png)");
        assert_eq!(out.copied, 0);
    }

    #[test]
    fn relative_subdirectory_references_resolve() {
        let src = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        fs::create_dir(src.path().join("img")).unwrap();
        fs::write(src.path().join("img/pic.png"), b"p").unwrap();

        let out = rewrite_images("![p](img/pic.png)", src.path(), out_dir.path(), "s");
        assert_eq!(out.markdown, "![p](../images/s/pic.png)");
        assert_eq!(out.copied, 1);
    }
}
