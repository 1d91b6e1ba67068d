//! Sanitization: deterministic redaction of sensitive strings before publication.
//!
//! ## Why is this the one module that must not be wrong?
//!
//! Everything else in the pipeline degrades gracefully — a mis-categorised post
//! or a broken image link is cosmetic. An under-redacted secret or an internal
//! IP address in a published page is a real incident. Every byte of user
//! content that reaches an output file passes through [`Sanitizer::sanitize`]
//! exactly once, on the raw Markdown, before any rendering or templating.
//!
//! ## Rule Order
//!
//! Rules run in a fixed order: bearer tokens before key/value pairs (a bearer
//! line also contains the word TOKEN-like headers), IP rewriting after both
//! (the replacement address must not itself be re-examined by earlier rules),
//! and term scrubbing last so the whitespace-repair pass can clean up the
//! holes it leaves.
//!
//! Sanitization is idempotent: running it twice yields the same text, because
//! every replacement value (`<REDACTED>`, `203.0.113.100`, `project`) is
//! itself accepted by the rule that produced it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::error::BlogError;

/// Placeholder substituted for secret values.
pub const REDACTED: &str = "<REDACTED>";

/// Replacement for any IPv4 address that is not allow-listed.
///
/// 203.0.113.100 sits in TEST-NET-3 (RFC 5737), so it can never collide with
/// a real routable host and is itself allow-listed, keeping the rule idempotent.
pub const REPLACEMENT_IP: &str = "203.0.113.100";

/// Literal replacement for scrubbed repository names.
const REPO_PLACEHOLDER: &str = "project";

// ── Patterns ─────────────────────────────────────────────────────────────

static RE_BEARER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Authorization:\s*Bearer)[ \t]+[^\n\r]+").unwrap());

static RE_SECRET_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(SECRET|TOKEN|PASSWORD|PASSWD|API[_-]?KEY)\b(\s*[:=]\s*)([^\s"']+)"#)
        .unwrap()
});

static RE_IPV4: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,3}(?:\.\d{1,3}){3})\b").unwrap());

static RE_MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

// ── Rules ────────────────────────────────────────────────────────────────

/// User-configurable sanitization vocabulary.
///
/// The built-in patterns (bearer tokens, key/value secrets, IPv4 allowlist)
/// are always active; these fields extend them with site-specific terms.
/// Term lists default to empty — employer and repository names are
/// configuration, not code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SanitizeRules {
    /// Employer/company names removed outright (case-insensitive, whole word).
    pub company_terms: Vec<String>,
    /// Repository names replaced with "project" (case-insensitive, literal).
    pub repo_terms: Vec<String>,
    /// Additional IPv4 addresses allowed to appear verbatim.
    pub allowed_ips: Vec<Ipv4Addr>,
}

/// Per-rule redaction counts for one sanitization pass.
///
/// Counts are informational (they feed [`crate::output::BuildStats`] and the
/// CLI summary); the text result alone decides what gets published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    pub bearer_tokens: usize,
    pub secret_pairs: usize,
    pub ip_addresses: usize,
    pub company_terms: usize,
    pub repo_terms: usize,
}

impl SanitizeReport {
    /// Total number of redactions across all rules.
    pub fn total(&self) -> usize {
        self.bearer_tokens
            + self.secret_pairs
            + self.ip_addresses
            + self.company_terms
            + self.repo_terms
    }

    /// Accumulate another report into this one.
    pub fn merge(&mut self, other: &SanitizeReport) {
        self.bearer_tokens += other.bearer_tokens;
        self.secret_pairs += other.secret_pairs;
        self.ip_addresses += other.ip_addresses;
        self.company_terms += other.company_terms;
        self.repo_terms += other.repo_terms;
    }
}

// ── Sanitizer ────────────────────────────────────────────────────────────

/// A compiled sanitizer, built once per run and shared across posts.
///
/// Term patterns are compiled here rather than per call so a build of a few
/// hundred posts pays the regex-compilation cost exactly once.
pub struct Sanitizer {
    company_patterns: Vec<Regex>,
    repo_patterns: Vec<Regex>,
    allowed_ips: Vec<Ipv4Addr>,
}

impl Sanitizer {
    /// Compile the given rules into a reusable sanitizer.
    pub fn new(rules: &SanitizeRules) -> Result<Self, BlogError> {
        let company_patterns = rules
            .company_terms
            .iter()
            .map(|t| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(t))).map_err(|e| {
                    BlogError::InvalidConfig(format!("bad company term '{t}': {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Repo slugs contain hyphens, so no word-boundary anchors here: a
        // boundary between '-' and an alphanumeric would split the slug.
        let repo_patterns = rules
            .repo_terms
            .iter()
            .map(|t| {
                Regex::new(&format!(r"(?i){}", regex::escape(t)))
                    .map_err(|e| BlogError::InvalidConfig(format!("bad repo term '{t}': {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            company_patterns,
            repo_patterns,
            allowed_ips: rules.allowed_ips.clone(),
        })
    }

    /// Apply all sanitization rules to `input`, returning the redacted text
    /// and a per-rule count of what was changed.
    pub fn sanitize(&self, input: &str) -> (String, SanitizeReport) {
        let mut report = SanitizeReport::default();

        let s = redact_bearer(input, &mut report.bearer_tokens);
        let s = redact_secret_pairs(&s, &mut report.secret_pairs);
        let s = self.redact_ips(&s, &mut report.ip_addresses);
        let s = self.scrub_terms(&s, &mut report);
        let s = collapse_spaces(&s);

        (s, report)
    }

    /// True when `candidate` may appear verbatim in published output.
    ///
    /// A dotted-quad that fails to parse is NOT safe: the redaction must fail
    /// closed, so malformed candidates are replaced rather than passed through.
    fn ip_is_safe(&self, candidate: &str) -> bool {
        let ip: Ipv4Addr = match candidate.parse() {
            Ok(ip) => ip,
            Err(_) => return false,
        };

        if self.allowed_ips.contains(&ip) {
            return true;
        }

        // Well-known public resolvers that carry no site information.
        const PUBLIC_RESOLVERS: [Ipv4Addr; 4] = [
            Ipv4Addr::new(8, 8, 8, 8),
            Ipv4Addr::new(8, 8, 4, 4),
            Ipv4Addr::new(1, 1, 1, 1),
            Ipv4Addr::new(1, 0, 0, 1),
        ];
        if PUBLIC_RESOLVERS.contains(&ip) {
            return true;
        }

        // RFC 1918, loopback, unspecified, broadcast.
        if ip.is_private() || ip.is_loopback() || ip.is_unspecified() || ip.is_broadcast() {
            return true;
        }

        // RFC 5737 documentation ranges.
        matches!(
            ip.octets(),
            [192, 0, 2, _] | [198, 51, 100, _] | [203, 0, 113, _]
        )
    }

    fn redact_ips(&self, input: &str, count: &mut usize) -> String {
        RE_IPV4
            .replace_all(input, |caps: &regex::Captures<'_>| {
                let candidate = &caps[1];
                if self.ip_is_safe(candidate) {
                    candidate.to_string()
                } else {
                    *count += 1;
                    REPLACEMENT_IP.to_string()
                }
            })
            .into_owned()
    }

    fn scrub_terms(&self, input: &str, report: &mut SanitizeReport) -> String {
        let mut s = input.to_string();
        for pat in &self.company_patterns {
            let hits = pat.find_iter(&s).count();
            if hits > 0 {
                report.company_terms += hits;
                s = pat.replace_all(&s, "").into_owned();
            }
        }
        for pat in &self.repo_patterns {
            let hits = pat.find_iter(&s).count();
            if hits > 0 {
                report.repo_terms += hits;
                s = pat.replace_all(&s, REPO_PLACEHOLDER).into_owned();
            }
        }
        s
    }
}

// ── Built-in rules ───────────────────────────────────────────────────────

fn redact_bearer(input: &str, count: &mut usize) -> String {
    RE_BEARER
        .replace_all(input, |caps: &regex::Captures<'_>| {
            *count += 1;
            format!("{} {}", &caps[1], REDACTED)
        })
        .into_owned()
}

fn redact_secret_pairs(input: &str, count: &mut usize) -> String {
    RE_SECRET_PAIR
        .replace_all(input, |caps: &regex::Captures<'_>| {
            *count += 1;
            format!("{}{}{}", &caps[1], &caps[2], REDACTED)
        })
        .into_owned()
}

/// Collapse runs of 2+ interior spaces left behind by term removal.
///
/// Leading whitespace is preserved (Markdown list nesting and indented code
/// are significant) and fenced code blocks are skipped entirely.
fn collapse_spaces(input: &str) -> String {
    let mut in_fence = false;
    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                return line.to_string();
            }
            if in_fence {
                return line.to_string();
            }
            let content_start = line.len() - line.trim_start().len();
            let (lead, rest) = line.split_at(content_start);
            format!("{lead}{}", RE_MULTI_SPACE.replace_all(rest, " "))
        })
        .collect();

    let mut out = lines.join("\n");
    if input.ends_with('\n') {
        out.push('\n');
    }
    out
}

// ── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitizer() -> Sanitizer {
        Sanitizer::new(&SanitizeRules::default()).unwrap()
    }

    fn sanitizer_with_terms() -> Sanitizer {
        Sanitizer::new(&SanitizeRules {
            company_terms: vec!["Initech".into()],
            repo_terms: vec!["core-net-tools".into(), "deploy-main".into()],
            allowed_ips: vec![],
        })
        .unwrap()
    }

    #[test]
    fn redacts_bearer_token_to_end_of_line() {
        let input = "curl -H 'Authorization: Bearer eyJhbGciOi.abc.def' https://api";
        let (out, rep) = sanitizer().sanitize(input);
        assert!(!out.contains("eyJhbGciOi"));
        assert!(out.contains("Authorization: Bearer <REDACTED>"));
        assert_eq!(rep.bearer_tokens, 1);
    }

    #[test]
    fn bearer_is_case_insensitive() {
        let (out, _) = sanitizer().sanitize("authorization: bearer s3cr3t");
        assert!(!out.contains("s3cr3t"));
    }

    #[test]
    fn redacts_key_value_secrets() {
        let input = "export API_KEY=sk-live-12345\npassword: hunter2\nTOKEN = abc";
        let (out, rep) = sanitizer().sanitize(input);
        assert!(!out.contains("sk-live-12345"));
        assert!(!out.contains("hunter2"));
        assert!(!out.contains("abc"), "got: {out}");
        assert!(out.contains("API_KEY=<REDACTED>"));
        assert!(out.contains("password: <REDACTED>"));
        assert_eq!(rep.secret_pairs, 3);
    }

    #[test]
    fn key_and_delimiter_are_preserved() {
        let (out, _) = sanitizer().sanitize("api-key = topsecret");
        assert_eq!(out, "api-key = <REDACTED>");
    }

    #[test]
    fn public_ip_is_replaced() {
        let (out, rep) = sanitizer().sanitize("ssh admin@89.221.38.84");
        assert_eq!(out, format!("ssh admin@{REPLACEMENT_IP}"));
        assert_eq!(rep.ip_addresses, 1);
    }

    #[test]
    fn private_and_loopback_ips_pass_through() {
        let input = "10.0.4.2, 172.16.0.1, 192.168.1.100, 127.0.0.1";
        let (out, rep) = sanitizer().sanitize(input);
        assert_eq!(out, input);
        assert_eq!(rep.ip_addresses, 0);
    }

    #[test]
    fn documentation_ranges_and_resolvers_pass_through() {
        let input = "dns 8.8.8.8 and 1.1.1.1, doc 192.0.2.7 198.51.100.1 203.0.113.9";
        let (out, _) = sanitizer().sanitize(input);
        assert_eq!(out, input);
    }

    #[test]
    fn malformed_dotted_quad_fails_closed() {
        // 999.1.1.1 is not a valid address; it must be redacted, not skipped.
        let (out, rep) = sanitizer().sanitize("host at 999.1.1.1 down");
        assert!(!out.contains("999.1.1.1"));
        assert_eq!(rep.ip_addresses, 1);
    }

    #[test]
    fn extra_allowed_ip_is_honoured() {
        let s = Sanitizer::new(&SanitizeRules {
            allowed_ips: vec![Ipv4Addr::new(52, 1, 2, 3)],
            ..SanitizeRules::default()
        })
        .unwrap();
        let (out, _) = s.sanitize("lb at 52.1.2.3, api at 52.1.2.4");
        assert!(out.contains("52.1.2.3"));
        assert!(!out.contains("52.1.2.4"));
    }

    #[test]
    fn company_term_removed_and_spaces_repaired() {
        let (out, rep) = sanitizer_with_terms().sanitize("Worked at Initech on routers.");
        assert_eq!(out, "Worked at on routers.");
        assert_eq!(rep.company_terms, 1);
    }

    #[test]
    fn company_term_respects_word_boundaries() {
        let (out, _) = sanitizer_with_terms().sanitize("The Initechnical manual");
        assert!(out.contains("Initechnical"), "got: {out}");
    }

    #[test]
    fn repo_terms_replaced_with_project() {
        let (out, rep) = sanitizer_with_terms().sanitize("Cloned core-net-tools and deploy-main");
        assert_eq!(out, "Cloned project and project");
        assert_eq!(rep.repo_terms, 2);
    }

    #[test]
    fn repo_terms_are_case_insensitive() {
        let (out, _) = sanitizer_with_terms().sanitize("see Core-Net-Tools repo");
        assert_eq!(out, "see project repo");
    }

    #[test]
    fn indented_code_and_fences_keep_their_spacing() {
        let input = "text  here\n\n    indented   code\n\n```\nfenced   code\n```\n";
        let (out, _) = sanitizer().sanitize(input);
        assert!(out.contains("text here"));
        assert!(out.contains("    indented   code"));
        assert!(out.contains("fenced   code"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn empty_input_is_empty_output() {
        let (out, rep) = sanitizer().sanitize("");
        assert_eq!(out, "");
        assert_eq!(rep.total(), 0);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let input = "API_KEY=abc at 89.221.38.84\nAuthorization: Bearer xyz\nInitech core-net-tools";
        let s = sanitizer_with_terms();
        let (once, _) = s.sanitize(input);
        let (twice, _) = s.sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn report_totals_and_merge() {
        let mut a = SanitizeReport {
            bearer_tokens: 1,
            secret_pairs: 2,
            ..SanitizeReport::default()
        };
        let b = SanitizeReport {
            ip_addresses: 3,
            ..SanitizeReport::default()
        };
        a.merge(&b);
        assert_eq!(a.total(), 6);
    }
}
