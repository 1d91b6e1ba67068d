//! Markdown rendering and metadata extraction.

use pulldown_cmark::{html, Options, Parser};

/// Render Markdown to an HTML fragment with the GitHub-flavoured extensions
/// enabled (tables, footnotes, strikethrough, task lists).
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Title of a post: the first level-1 heading, or `fallback` when the note
/// has none.
pub fn extract_title(markdown: &str, fallback: &str) -> String {
    for line in markdown.lines() {
        if let Some(rest) = line.trim_start().strip_prefix("# ") {
            let title = rest.trim();
            if !title.is_empty() {
                return title.to_string();
            }
        }
    }
    fallback.to_string()
}

/// Teaser for the index card: the first line that is neither blank nor a
/// heading, truncated on a character boundary.
pub fn extract_teaser(markdown: &str, max_chars: usize) -> String {
    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut teaser: String = trimmed.chars().take(max_chars).collect();
        if trimmed.chars().count() > max_chars {
            teaser.push('…');
        }
        return teaser;
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_basic_markdown() {
        let html = render_markdown("# Hello\n\nSome *text*.\n");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn renders_tables() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn title_is_first_h1() {
        let md = "intro line\n\n# Real Title\n\n# Second heading\n";
        assert_eq!(extract_title(md, "fallback"), "Real Title");
    }

    #[test]
    fn title_falls_back_to_stem() {
        assert_eq!(extract_title("no headings here\n", "blog-post"), "blog-post");
    }

    #[test]
    fn empty_h1_is_skipped() {
        assert_eq!(extract_title("# \n# Actual\n", "x"), "Actual");
    }

    #[test]
    fn teaser_skips_blank_lines_and_headings() {
        let md = "# Title\n\n## Sub\n\nFirst real paragraph.\nSecond line.\n";
        assert_eq!(extract_teaser(md, 200), "First real paragraph.");
    }

    #[test]
    fn teaser_truncates_with_ellipsis() {
        let teaser = extract_teaser("abcdefghij\n", 5);
        assert_eq!(teaser, "abcde…");
    }

    #[test]
    fn teaser_of_headings_only_is_empty() {
        assert_eq!(extract_teaser("# one\n## two\n", 100), "");
    }
}
