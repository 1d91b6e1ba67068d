//! Single-post page template.

use html_escape::encode_text;

use super::{page_close, page_open};

/// Marker div wrapping the rendered Markdown body. [`super::merge`] relies
/// on this exact string to locate post bodies.
pub(crate) const BODY_MARKER: &str = r#"<div class="content markdown">"#;

/// Render a complete post page around the already-rendered `body_html`.
pub fn post_page(
    site_title: &str,
    about: Option<&str>,
    title: &str,
    teaser: &str,
    category_label: &str,
    body_html: &str,
) -> String {
    let mut page = page_open(site_title, title, "../");
    let title_esc = encode_text(title);
    let category_esc = encode_text(category_label);
    let teaser_html = if teaser.is_empty() {
        String::new()
    } else {
        format!("<p class=\"teaser\">{}</p>\n", encode_text(teaser))
    };
    page.push_str(&format!(
        r#"            <article class="post">
                <header>
                    <div class="title">
                        <h2>{title_esc}</h2>
                        {teaser_html}
                    </div>
                    <div class="meta">
                        <span class="category">{category_esc}</span>
                    </div>
                </header>
                {BODY_MARKER}
{body_html}
                </div>
                <footer>
                    <ul class="actions">
                        <li><a href="../index.html" class="button">&larr; All posts</a></li>
                    </ul>
                </footer>
            </article>
"#
    ));
    page.push_str(&page_close(site_title, about, "../", ""));
    page
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_contains_body_and_back_link() {
        let page = post_page(
            "Site",
            None,
            "My Post",
            "A short teaser",
            "AWS & Cloud",
            "<p>hello</p>",
        );
        assert!(page.contains("<p>hello</p>"));
        assert!(page.contains(BODY_MARKER));
        assert!(page.contains("<h2>My Post</h2>"));
        assert!(page.contains("AWS &amp; Cloud"));
        assert!(page.contains(r#"href="../index.html""#));
    }

    #[test]
    fn title_is_escaped_but_body_is_not() {
        let page = post_page("S", None, "a <b> c", "", "Other", "<em>kept</em>");
        assert!(page.contains("a &lt;b&gt; c"));
        assert!(page.contains("<em>kept</em>"));
    }

    #[test]
    fn empty_teaser_emits_no_paragraph() {
        let page = post_page("S", None, "T", "", "Other", "");
        assert!(!page.contains("class=\"teaser\""));
    }
}
