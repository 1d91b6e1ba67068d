//! Discovery: find eligible notes under the source tree and assign slugs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::BlogError;

/// Filename substrings that always exclude a note, regardless of the "blog"
/// marker. These cover private material kept alongside the notes.
const BUILTIN_EXCLUDES: [&str; 4] = ["linkedin", "workdone", "work-done", "summary"];

/// A note selected for publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredPost {
    /// Absolute (or source-relative) path of the note.
    pub path: PathBuf,
    /// Path relative to the source root, with `/` separators.
    pub rel: String,
    /// Output slug; unique within one build.
    pub slug: String,
}

/// Walk `source` and return every eligible note, sorted by relative path.
///
/// A note is eligible when it has a `.md` extension, its lowercased filename
/// contains `blog`, and no exclude pattern (built-in or user-supplied)
/// matches the lowercased filename. Unreadable subdirectories are skipped
/// with a warning rather than failing the walk.
pub fn discover_posts(
    source: &Path,
    exclude_patterns: &[String],
) -> Result<Vec<DiscoveredPost>, BlogError> {
    if !source.exists() {
        return Err(BlogError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    let mut posts = Vec::new();
    for entry in WalkDir::new(source).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_lowercase(),
            None => continue,
        };
        if !name.contains("blog") {
            continue;
        }
        if BUILTIN_EXCLUDES.iter().any(|p| name.contains(p)) {
            debug!(path = %path.display(), "excluded by built-in pattern");
            continue;
        }
        if exclude_patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
        {
            debug!(path = %path.display(), "excluded by user pattern");
            continue;
        }

        let rel = path
            .strip_prefix(source)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let slug = slug_for(&rel);
        posts.push(DiscoveredPost {
            path: path.to_path_buf(),
            rel,
            slug,
        });
    }

    posts.sort_by(|a, b| a.rel.cmp(&b.rel));
    debug!(count = posts.len(), "discovery complete");
    Ok(posts)
}

/// Derive a slug from a source-relative path: strip the `.md` extension and
/// replace path separators with `--`, so the slug round-trips to the source
/// location.
pub fn slug_for(rel: &str) -> String {
    let stem = rel.strip_suffix(".md").unwrap_or(rel);
    stem.replace('/', "--")
}

/// Optionally flatten slugs to their last path segment.
///
/// Flattening drops everything up to and including the first `--`. Collisions
/// are disambiguated deterministically with `-2`, `-3`, ... suffixes in
/// discovery order, so reruns over an unchanged tree produce the same names.
pub fn resolve_slugs(posts: &mut [DiscoveredPost], flatten: bool) {
    if !flatten {
        return;
    }
    let mut seen: HashMap<String, usize> = HashMap::new();
    for post in posts.iter_mut() {
        let base = match post.slug.split_once("--") {
            Some((_, rest)) => rest.to_string(),
            None => post.slug.clone(),
        };
        let n = seen.entry(base.clone()).or_insert(0);
        *n += 1;
        post.slug = if *n == 1 { base } else { format!("{base}-{n}") };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, rel: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "# stub\n").unwrap();
    }

    #[test]
    fn finds_only_blog_markdown() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "aws/2021-blog-migration.md");
        touch(&dir, "aws/readme.md");
        touch(&dir, "notes-blog.txt");
        touch(&dir, "k8s-BLOG-setup.md");

        let posts = discover_posts(dir.path(), &[]).unwrap();
        let rels: Vec<&str> = posts.iter().map(|p| p.rel.as_str()).collect();
        assert_eq!(rels, vec!["aws/2021-blog-migration.md", "k8s-BLOG-setup.md"]);
    }

    #[test]
    fn builtin_excludes_apply() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "linkedin-blog.md");
        touch(&dir, "blog-workdone.md");
        touch(&dir, "blog-work-done-2021.md");
        touch(&dir, "blog-summary.md");
        touch(&dir, "real-blog.md");

        let posts = discover_posts(dir.path(), &[]).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].rel, "real-blog.md");
    }

    #[test]
    fn user_excludes_are_case_insensitive() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "blog-draft.md");
        touch(&dir, "blog-final.md");

        let posts = discover_posts(dir.path(), &["DRAFT".to_string()]).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].rel, "blog-final.md");
    }

    #[test]
    fn missing_source_is_an_error() {
        let err = discover_posts(Path::new("/no/such/dir"), &[]).unwrap_err();
        assert!(matches!(err, BlogError::SourceNotFound { .. }));
    }

    #[test]
    fn slug_encodes_directories() {
        assert_eq!(slug_for("aws/2021/blog-x.md"), "aws--2021--blog-x");
        assert_eq!(slug_for("blog-y.md"), "blog-y");
    }

    fn post(rel: &str) -> DiscoveredPost {
        DiscoveredPost {
            path: PathBuf::from(rel),
            rel: rel.to_string(),
            slug: slug_for(rel),
        }
    }

    #[test]
    fn flatten_keeps_last_segment_and_numbers_collisions() {
        let mut posts = vec![
            post("aws/blog-setup.md"),
            post("gcp/blog-setup.md"),
            post("blog-other.md"),
        ];
        resolve_slugs(&mut posts, true);
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["blog-setup", "blog-setup-2", "blog-other"]);
    }

    #[test]
    fn no_flatten_leaves_slugs_alone() {
        let mut posts = vec![post("aws/blog-setup.md")];
        resolve_slugs(&mut posts, false);
        assert_eq!(posts[0].slug, "aws--blog-setup");
    }
}
