//! Index page: post cards, category filter navigation, and the inline
//! hash-based filter script.
//!
//! The filter is plain client-side JavaScript generated from the categories
//! actually present in this build, so the page works from `file://` with no
//! server and stale filters never appear in the nav.

use std::collections::BTreeMap;

use html_escape::encode_text;

use super::{page_close, page_open};
use crate::output::PostResult;
use crate::pipeline::categorize::category_label;

/// Render the site index for the given (successfully rendered) posts.
pub fn index_page(site_title: &str, about: Option<&str>, posts: &[&PostResult]) -> String {
    // BTreeMap keeps the nav ordering stable across builds.
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for post in posts {
        *counts.entry(post.category.as_str()).or_insert(0) += 1;
    }

    let mut page = page_open(site_title, "Home", "");

    page.push_str("            <nav id=\"filters\">\n                <ul>\n");
    page.push_str(&format!(
        "                    <li><a href=\"#\" data-filter=\"all\" class=\"active\">All ({})</a></li>\n",
        posts.len()
    ));
    for (category, count) in &counts {
        page.push_str(&format!(
            "                    <li><a href=\"#{category}\" data-filter=\"{category}\">{} ({count})</a></li>\n",
            encode_text(&category_label(category))
        ));
    }
    page.push_str("                </ul>\n            </nav>\n");

    page.push_str("            <section id=\"posts\">\n");
    for post in posts {
        let title = encode_text(&post.title);
        let teaser = encode_text(&post.teaser);
        let category_name = category_label(&post.category);
        let label = encode_text(&category_name);
        page.push_str(&format!(
            r#"                <article class="post-card" data-category="{category}">
                    <header>
                        <div class="title">
                            <h2><a href="posts/{slug}.html">{title}</a></h2>
                        </div>
                        <div class="meta">
                            <span class="category">{label}</span>
                        </div>
                    </header>
                    <p>{teaser}</p>
                    <footer>
                        <ul class="actions">
                            <li><a href="posts/{slug}.html" class="button large">Continue Reading</a></li>
                        </ul>
                    </footer>
                </article>
"#,
            category = post.category,
            slug = post.slug,
        ));
    }
    page.push_str("            </section>\n");

    page.push_str(&filter_script(&counts));
    page.push_str(&page_close(site_title, about, "", &sidebar_categories(&counts)));
    page
}

/// Sidebar category list with counts, mirroring the filter nav.
fn sidebar_categories(counts: &BTreeMap<&str, usize>) -> String {
    let mut html = String::from(
        "            <section id=\"categories\">\n                <h3>Categories</h3>\n                <ul>\n",
    );
    for (category, count) in counts {
        html.push_str(&format!(
            "                    <li><a href=\"#{category}\">{} ({count})</a></li>\n",
            encode_text(&category_label(category))
        ));
    }
    html.push_str("                </ul>\n            </section>\n");
    html
}

/// Inline filter script. The category list is baked in from this build so
/// unknown hashes fall back to showing everything.
fn filter_script(counts: &BTreeMap<&str, usize>) -> String {
    let cats: Vec<String> = counts.keys().map(|c| format!("\"{c}\"")).collect();
    let cats = cats.join(", ");
    format!(
        r##"            <script>
            (function () {{
                var known = [{cats}];
                function setFilter(cat) {{
                    var cards = document.querySelectorAll("#posts .post-card");
                    cards.forEach(function (card) {{
                        var show = cat === "all" || card.dataset.category === cat;
                        card.style.display = show ? "" : "none";
                    }});
                    document.querySelectorAll("#filters a").forEach(function (link) {{
                        link.classList.toggle("active", link.dataset.filter === cat);
                    }});
                }}
                function applyFromHash() {{
                    var cat = window.location.hash.replace("#", "");
                    setFilter(known.indexOf(cat) >= 0 ? cat : "all");
                }}
                window.addEventListener("hashchange", applyFromHash);
                applyFromHash();
            }})();
            </script>
"##
    )
}
