//! HTML generation: the "Future Imperfect" style page templates.
//!
//! Templates are plain string builders. All user-derived text is escaped
//! with `html_escape` before interpolation; post bodies are inserted as-is
//! because they come from the Markdown renderer operating on already
//! sanitized input.

pub mod index;
pub mod merge;
pub mod post;

use html_escape::encode_text;

/// Shared page skeleton up to and including the opening of `<div id="main">`.
///
/// `root` is the relative prefix back to the site root: empty for the index
/// page, `../` for pages under `posts/`.
pub(crate) fn page_open(site_title: &str, page_title: &str, root: &str) -> String {
    let site = encode_text(site_title);
    let page = encode_text(page_title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{page} - {site}</title>
    <link rel="stylesheet" href="{root}assets/css/main.css">
</head>
<body class="is-preload">
    <div id="wrapper">
        <header id="header">
            <h1><a href="{root}index.html">{site}</a></h1>
        </header>
        <div id="main">
"#
    )
}

/// Shared page skeleton: sidebar, footer, and theme scripts.
///
/// `sidebar_extra` is inserted after the intro block; the index page uses it
/// for its category list.
pub(crate) fn page_close(
    site_title: &str,
    about: Option<&str>,
    root: &str,
    sidebar_extra: &str,
) -> String {
    let site = encode_text(site_title);
    let about_html = match about {
        Some(text) => format!("<p>{}</p>", encode_text(text)),
        None => String::new(),
    };
    format!(
        r#"        </div>
        <section id="sidebar">
            <section id="intro">
                <header>
                    <h2>{site}</h2>
                    {about_html}
                </header>
            </section>
{sidebar_extra}        </section>
        <footer id="footer">
            <p class="copyright">Generated from personal notes.</p>
        </footer>
    </div>
    <script src="{root}assets/js/jquery.min.js"></script>
    <script src="{root}assets/js/main.js"></script>
</body>
</html>
"#
    )
}
