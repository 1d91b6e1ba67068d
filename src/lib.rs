//! notepress: turn a directory of Markdown notes into a static personal blog.
//!
//! Notes whose filenames contain `blog` are discovered, sanitized (secrets,
//! internal IP addresses, and configured employer/repository names are
//! redacted), rendered to HTML in a "Future Imperfect" style layout, and
//! listed on an index page with client-side category filters. A companion
//! extractor pulls the profile summary out of a résumé PDF for the sidebar.
//!
//! ```text
//! notes/**/*blog*.md
//!     |
//!     v
//! discover ──> sanitize ──> images ──> markdown ──> categorize
//!     |                                                  |
//!     v                                                  v
//! <out>/posts/<slug>.html  <────────────────────  page templates
//! <out>/index.html (cards, filters)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use notepress::SiteConfig;
//!
//! # async fn run() -> Result<(), notepress::BlogError> {
//! let config = SiteConfig::builder("notes")
//!     .output("public")
//!     .scrub_company("Initech")
//!     .build()?;
//! let output = notepress::build(&config).await?;
//! println!("rendered {} posts", output.stats.rendered_posts);
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod resume;
pub mod site;
pub mod stream;

pub use build::{build, build_sync};
pub use config::{SiteConfig, SiteConfigBuilder};
pub use error::{BlogError, PostError};
pub use output::{BuildOutput, BuildStats, PostResult};
pub use pipeline::sanitize::{SanitizeReport, SanitizeRules, Sanitizer};
pub use progress::{BuildProgressCallback, NoopProgressCallback, ProgressCallback};
pub use resume::{extract_profile, ResumeProfile};
pub use site::merge::{merge_posts, MergeSpec};
pub use stream::{build_stream, PostStream};
