//! Category assignment from source paths.
//!
//! A post's category is inferred from keywords in its path: the filename is
//! checked first (user-supplied mappings before the built-in table), then the
//! full relative path. First match wins; posts with no match land in
//! `other`.

/// Built-in keyword to category table, checked in order.
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("aws", "aws"),
    ("k8s", "containers"),
    ("kubernetes", "containers"),
    ("container", "containers"),
    ("docker", "containers"),
    ("monitor", "monitoring"),
    ("observab", "monitoring"),
    ("prometheus", "monitoring"),
    ("infra", "infra"),
    ("network", "infra"),
    ("dns", "infra"),
    ("ims", "telecom"),
    ("epc", "telecom"),
    ("stp", "telecom"),
    ("diameter", "telecom"),
    ("gtp", "telecom"),
    ("telecom", "telecom"),
    ("devops", "devops"),
    ("cicd", "devops"),
    ("ansible", "automation"),
    ("automation", "automation"),
    ("security", "security"),
    ("vault", "security"),
];

/// Fallback category for posts no keyword matches.
pub const DEFAULT_CATEGORY: &str = "other";

/// Human-readable label for a category key.
///
/// Unknown keys (from user-supplied mappings) get their first letter
/// capitalised.
pub fn category_label(category: &str) -> String {
    match category {
        "aws" => "AWS".to_string(),
        "containers" => "Containers".to_string(),
        "monitoring" => "Monitoring".to_string(),
        "infra" => "Infra".to_string(),
        "telecom" => "Telecom".to_string(),
        "devops" => "DevOps".to_string(),
        "automation" => "Automation".to_string(),
        "security" => "Security".to_string(),
        "other" => "Other".to_string(),
        custom => {
            let mut chars = custom.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

fn match_keywords(haystack: &str, extra: &[(String, String)]) -> Option<String> {
    for (keyword, category) in extra {
        if haystack.contains(&keyword.to_lowercase()) {
            return Some(category.clone());
        }
    }
    for (keyword, category) in CATEGORY_KEYWORDS {
        if haystack.contains(keyword) {
            return Some((*category).to_string());
        }
    }
    None
}

/// Pick a category for the post at source-relative path `rel`.
///
/// `extra` holds user-supplied keyword mappings, which take precedence over
/// the built-in table within each probe.
pub fn pick_category(rel: &str, extra: &[(String, String)]) -> String {
    let rel_lower = rel.to_lowercase();
    let filename = rel_lower.rsplit('/').next().unwrap_or(&rel_lower);

    match_keywords(filename, extra)
        .or_else(|| match_keywords(&rel_lower, extra))
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}
