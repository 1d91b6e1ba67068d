//! Merge two generated post pages into one.
//!
//! Useful when two notes cover halves of the same topic: after a build, the
//! two pages are combined into a single page with sections, and the source
//! pages are removed so the pair never appears twice.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::BlogError;
use crate::site::post::BODY_MARKER;
use html_escape::encode_text;

/// Which pages to merge and what to call the result.
#[derive(Debug, Clone)]
pub struct MergeSpec {
    /// Slug of the first page (its body comes first).
    pub first: String,
    /// Slug of the second page.
    pub second: String,
    /// Title of the merged page.
    pub title: String,
    /// Slug (filename stem) of the merged page.
    pub slug: String,
}

/// Extract the rendered body from a generated post page.
///
/// Finds the body marker div and scans forward tracking `<div`/`</div>`
/// nesting until the marker's own closing tag. Returns `None` when the page
/// does not look like one of ours.
pub(crate) fn extract_body(page: &str) -> Option<&str> {
    let start = page.find(BODY_MARKER)? + BODY_MARKER.len();
    let rest = &page[start..];

    let mut depth = 1usize;
    let mut pos = 0usize;
    while depth > 0 {
        let open = rest[pos..].find("<div");
        let close = rest[pos..].find("</div>")?;
        match open {
            Some(open) if open < close => {
                depth += 1;
                pos += open + 4;
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(rest[..pos + close].trim_matches('\n'));
                }
                pos += close + 6;
            }
        }
    }
    None
}

fn read_body(posts_dir: &Path, slug: &str) -> Option<(PathBuf, String)> {
    let path = posts_dir.join(format!("{slug}.html"));
    let page = match std::fs::read_to_string(&path) {
        Ok(page) => page,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "merge input not readable");
            return None;
        }
    };
    match extract_body(&page) {
        Some(body) => Some((path, body.to_string())),
        None => {
            warn!(path = %path.display(), "merge input has no recognisable body");
            None
        }
    }
}

/// Merge the two pages named by `spec` under `posts_dir`.
///
/// Missing or unparsable inputs are skipped; with at least one body the
/// merged page is written and the consumed source pages deleted. Returns the
/// merged page's path, or `Ok(None)` when neither input yielded a body.
pub fn merge_posts(
    posts_dir: &Path,
    spec: &MergeSpec,
    site_title: &str,
) -> Result<Option<PathBuf>, BlogError> {
    let inputs: Vec<(PathBuf, String)> = [&spec.first, &spec.second]
        .iter()
        .filter_map(|slug| read_body(posts_dir, slug))
        .collect();
    if inputs.is_empty() {
        return Ok(None);
    }

    let mut page = super::page_open(site_title, &spec.title, "../");
    page.push_str(&format!(
        "            <article class=\"post\">\n                <header>\n                    <div class=\"title\">\n                        <h2>{}</h2>\n                    </div>\n                </header>\n                {BODY_MARKER}\n",
        encode_text(&spec.title)
    ));
    for (n, (_, body)) in inputs.iter().enumerate() {
        page.push_str(&format!(
            "<section>\n<h3>Section {}</h3>\n{body}\n</section>\n",
            n + 1
        ));
    }
    page.push_str("                </div>\n            </article>\n");
    page.push_str(&super::page_close(site_title, None, "../", ""));

    let out_path = posts_dir.join(format!("{}.html", spec.slug));
    std::fs::write(&out_path, &page).map_err(|source| BlogError::OutputWriteFailed {
        path: out_path.clone(),
        source,
    })?;

    for (path, _) in &inputs {
        if *path != out_path {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "could not remove merged source page");
            }
        }
    }

    info!(path = %out_path.display(), sections = inputs.len(), "merged pages");
    Ok(Some(out_path))
}
