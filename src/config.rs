//! Build configuration with a fluent builder.

use std::fmt;
use std::path::PathBuf;

use crate::error::BlogError;
use crate::pipeline::sanitize::SanitizeRules;
use crate::progress::ProgressCallback;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "blog";

/// Default site title (also the name of the theme the templates imitate).
pub const DEFAULT_SITE_TITLE: &str = "Future Imperfect";

/// Default number of posts rendered concurrently.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Default timeout for résumé PDF downloads, in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Configuration for a site build.
///
/// Construct via [`SiteConfig::builder`]; every field has a sensible default
/// except `source`, which must point at the notes directory.
#[derive(Clone)]
pub struct SiteConfig {
    /// Directory scanned for eligible Markdown notes.
    pub source: PathBuf,
    /// Directory the generated site is written to.
    pub output: PathBuf,
    /// Title shown in the header of every generated page.
    pub site_title: String,
    /// Optional one-line author blurb for the sidebar.
    pub about: Option<String>,
    /// Maximum number of posts rendered concurrently.
    pub concurrency: usize,
    /// When set, drop directory prefixes from slugs (keeping them unique).
    pub flatten_slugs: bool,
    /// Sanitization vocabulary applied to every post.
    pub rules: SanitizeRules,
    /// Extra filename keyword to category mappings, checked before the
    /// built-in table.
    pub extra_categories: Vec<(String, String)>,
    /// Case-insensitive substrings that exclude a note from discovery, in
    /// addition to the built-in exclusions.
    pub exclude_patterns: Vec<String>,
    /// Timeout for résumé PDF downloads, in seconds.
    pub download_timeout_secs: u64,
    /// Optional observer notified as posts are rendered.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteConfig")
            .field("source", &self.source)
            .field("output", &self.output)
            .field("site_title", &self.site_title)
            .field("about", &self.about)
            .field("concurrency", &self.concurrency)
            .field("flatten_slugs", &self.flatten_slugs)
            .field("rules", &self.rules)
            .field("extra_categories", &self.extra_categories)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl SiteConfig {
    /// Start building a configuration for the given notes directory.
    pub fn builder(source: impl Into<PathBuf>) -> SiteConfigBuilder {
        SiteConfigBuilder::new(source)
    }
}

/// Builder for [`SiteConfig`].
#[derive(Clone)]
pub struct SiteConfigBuilder {
    config: SiteConfig,
}

impl SiteConfigBuilder {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            config: SiteConfig {
                source: source.into(),
                output: PathBuf::from(DEFAULT_OUTPUT_DIR),
                site_title: DEFAULT_SITE_TITLE.to_string(),
                about: None,
                concurrency: DEFAULT_CONCURRENCY,
                flatten_slugs: false,
                rules: SanitizeRules::default(),
                extra_categories: Vec::new(),
                exclude_patterns: Vec::new(),
                download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
                progress_callback: None,
            },
        }
    }

    /// Output directory for the generated site.
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    /// Title shown in the header of every page.
    pub fn site_title(mut self, title: impl Into<String>) -> Self {
        self.config.site_title = title.into();
        self
    }

    /// One-line author blurb for the sidebar.
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.config.about = Some(about.into());
        self
    }

    /// Number of posts rendered concurrently. Clamped to at least 1.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.max(1);
        self
    }

    /// Drop directory prefixes from slugs, disambiguating collisions with a
    /// numeric suffix.
    pub fn flatten_slugs(mut self, flatten: bool) -> Self {
        self.config.flatten_slugs = flatten;
        self
    }

    /// Replace the sanitization vocabulary wholesale.
    pub fn rules(mut self, rules: SanitizeRules) -> Self {
        self.config.rules = rules;
        self
    }

    /// Add one employer/company term to scrub.
    pub fn scrub_company(mut self, term: impl Into<String>) -> Self {
        self.config.rules.company_terms.push(term.into());
        self
    }

    /// Add one repository name to scrub.
    pub fn scrub_repo(mut self, term: impl Into<String>) -> Self {
        self.config.rules.repo_terms.push(term.into());
        self
    }

    /// Add a filename keyword to category mapping, checked before the
    /// built-in table.
    pub fn extra_category(
        mut self,
        keyword: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        self.config
            .extra_categories
            .push((keyword.into(), category.into()));
        self
    }

    /// Add a case-insensitive filename substring that excludes a note.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.config.exclude_patterns.push(pattern.into());
        self
    }

    /// Timeout for résumé PDF downloads, in seconds.
    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    /// Register an observer notified as posts are rendered.
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Validate and produce the final configuration.
    pub fn build(self) -> Result<SiteConfig, BlogError> {
        if self.config.source.as_os_str().is_empty() {
            return Err(BlogError::InvalidConfig(
                "source directory must not be empty".to_string(),
            ));
        }
        if self.config.site_title.trim().is_empty() {
            return Err(BlogError::InvalidConfig(
                "site title must not be empty".to_string(),
            ));
        }
        Ok(self.config)
    }
}
