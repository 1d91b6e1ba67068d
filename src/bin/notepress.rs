//! notepress command-line interface.

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use notepress::{
    build, extract_profile, merge_posts, BuildOutput, BuildProgressCallback, MergeSpec,
    SanitizeRules, SiteConfig,
};

const AFTER_HELP: &str = "\
Examples:
  # Build the blog from a notes directory
  notepress ~/notes -o public

  # Scrub employer and repository names, flatten slugs
  notepress ~/notes --scrub-company Initech --scrub-repo deploy-main --flatten-slugs

  # Extract the profile summary from a résumé PDF
  notepress --resume ~/Downloads/profile.pdf

  # Merge two generated pages into one
  notepress ~/notes --merge aws--blog-part1 --merge-with aws--blog-part2 \\
      --merge-title 'Cloud migration' --merge-slug cloud-migration
";

/// Turn a directory of Markdown notes into a static personal blog.
#[derive(Parser, Debug)]
#[command(name = "notepress", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Notes directory to scan (required unless --resume is used alone)
    source: Option<PathBuf>,

    /// Output directory for the generated site
    #[arg(short, long, default_value = "blog")]
    out: PathBuf,

    /// Site title shown on every page
    #[arg(long, default_value = "Future Imperfect")]
    site_title: String,

    /// One-line author blurb for the sidebar
    #[arg(long)]
    about: Option<String>,

    /// Number of posts rendered concurrently
    #[arg(short, long, default_value_t = 8)]
    concurrency: usize,

    /// Drop directory prefixes from slugs
    #[arg(long)]
    flatten_slugs: bool,

    /// Employer/company name to remove (repeatable)
    #[arg(long = "scrub-company", value_name = "TERM")]
    scrub_company: Vec<String>,

    /// Repository name to replace with "project" (repeatable)
    #[arg(long = "scrub-repo", value_name = "TERM")]
    scrub_repo: Vec<String>,

    /// Filename substring that excludes a note (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// IPv4 address allowed to appear verbatim (repeatable)
    #[arg(long = "allow-ip", value_name = "ADDR")]
    allow_ip: Vec<Ipv4Addr>,

    /// Résumé PDF (local path or URL) to extract a profile summary from
    #[arg(long, value_name = "PATH_OR_URL")]
    resume: Option<String>,

    /// Timeout for résumé downloads, in seconds
    #[arg(long, default_value_t = 120)]
    download_timeout: u64,

    /// Slug of the first page to merge (requires --merge-with)
    #[arg(long, value_name = "SLUG", requires = "merge_with")]
    merge: Option<String>,

    /// Slug of the second page to merge
    #[arg(long, value_name = "SLUG", requires = "merge")]
    merge_with: Option<String>,

    /// Title of the merged page
    #[arg(long, default_value = "Combined post")]
    merge_title: String,

    /// Slug of the merged page
    #[arg(long, default_value = "merged-post")]
    merge_slug: String,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

// ── ANSI helpers ─────────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}

fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}

fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Progress display ─────────────────────────────────────────────────────

struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl CliProgress {
    fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }
}

impl BuildProgressCallback for CliProgress {
    fn on_build_start(&self, total_posts: usize) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new(total_posts as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_post_complete(&self, _post_num: usize, _total_posts: usize, _html_len: usize) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.inc(1);
            }
        }
    }

    fn on_post_error(&self, _post_num: usize, _total_posts: usize, error: String) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.inc(1);
                bar.println(format!("{} {error}", red("✗")));
            }
        }
    }

    fn on_build_complete(&self, _total_posts: usize, _success_count: usize) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                bar.finish_and_clear();
            }
        }
    }
}

// ── Output ───────────────────────────────────────────────────────────────

fn print_summary(output: &BuildOutput, out_dir: &std::path::Path) {
    let stats = &output.stats;
    let mark = if stats.failed_posts == 0 {
        green("✔")
    } else {
        red("✗")
    };
    println!(
        "{mark} {} of {} posts rendered in {} ms",
        bold(&stats.rendered_posts.to_string()),
        stats.discovered_posts,
        stats.total_duration_ms
    );
    println!("  index: {}", cyan(&out_dir.join("index.html").display().to_string()));
    let red_total = stats.redactions.total();
    if red_total > 0 {
        println!(
            "  {}",
            dim(&format!(
                "{red_total} redactions ({} secrets, {} bearer tokens, {} IPs, {} terms)",
                stats.redactions.secret_pairs,
                stats.redactions.bearer_tokens,
                stats.redactions.ip_addresses,
                stats.redactions.company_terms + stats.redactions.repo_terms
            ))
        );
    }
    for post in output.posts.iter().filter(|p| !p.is_ok()) {
        if let Some(err) = &post.error {
            println!("  {} {}: {err}", red("✗"), post.slug);
        }
    }
}

/// Merge outcome for the `--json` report: the new page plus the source
/// slugs it consumed (their pages were deleted).
fn merge_json(spec: &MergeSpec, path: &std::path::Path) -> serde_json::Value {
    serde_json::json!({
        "slug": spec.slug,
        "path": path,
        "consumed": [spec.first, spec.second],
    })
}

fn setup_logging(cli: &Cli) {
    let default = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else if !cli.no_progress && !cli.json {
        // Keep the progress bar clean.
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli);

    // Résumé-only mode needs no source directory.
    if let Some(resume) = &cli.resume {
        let profile = extract_profile(resume, cli.download_timeout)
            .await
            .context("résumé extraction failed")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        } else {
            match &profile.summary {
                Some(summary) => println!("{summary}"),
                None => eprintln!("{}", red("no Summary section found")),
            }
        }
        if cli.source.is_none() {
            return Ok(());
        }
    }

    let source = match &cli.source {
        Some(source) => source.clone(),
        None => bail!("a notes directory is required (or use --resume alone)"),
    };

    let mut builder = SiteConfig::builder(&source)
        .output(&cli.out)
        .site_title(&cli.site_title)
        .concurrency(cli.concurrency)
        .flatten_slugs(cli.flatten_slugs)
        .download_timeout_secs(cli.download_timeout)
        .rules(SanitizeRules {
            company_terms: cli.scrub_company.clone(),
            repo_terms: cli.scrub_repo.clone(),
            allowed_ips: cli.allow_ip.clone(),
        });
    if let Some(about) = &cli.about {
        builder = builder.about(about);
    }
    for pattern in &cli.exclude {
        builder = builder.exclude(pattern);
    }
    if !cli.no_progress && !cli.json {
        builder = builder.progress_callback(Arc::new(CliProgress::new(cli.quiet)));
    }
    let config = builder.build()?;

    let output = build(&config).await.context("build failed")?;

    // The merge deletes its source pages, so its outcome has to travel with
    // the build report or the JSON would describe files that no longer exist.
    let mut merge_outcome = None;
    if let (Some(first), Some(second)) = (&cli.merge, &cli.merge_with) {
        let spec = MergeSpec {
            first: first.clone(),
            second: second.clone(),
            title: cli.merge_title.clone(),
            slug: cli.merge_slug.clone(),
        };
        let merged = merge_posts(&cli.out.join("posts"), &spec, &cli.site_title)
            .context("merge failed")?;
        if let Some(path) = merged {
            merge_outcome = Some(merge_json(&spec, &path));
        }
    }

    if cli.json {
        let mut doc = serde_json::to_value(&output)?;
        if let (Some(obj), Some(merge)) = (doc.as_object_mut(), merge_outcome.take()) {
            obj.insert("merge".to_string(), merge);
        }
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else if !cli.quiet {
        print_summary(&output, &cli.out);
        if let Some(merge) = &merge_outcome {
            let path = merge["path"].as_str().unwrap_or_default();
            println!("  merged: {}", cyan(path));
        }
    }

    if output.stats.failed_posts > 0 {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_json_names_result_and_consumed_slugs() {
        let spec = MergeSpec {
            first: "aws--blog-part1".to_string(),
            second: "aws--blog-part2".to_string(),
            title: "Cloud migration".to_string(),
            slug: "cloud-migration".to_string(),
        };
        let doc = merge_json(&spec, std::path::Path::new("blog/posts/cloud-migration.html"));
        assert_eq!(doc["slug"], "cloud-migration");
        assert_eq!(doc["consumed"][0], "aws--blog-part1");
        assert_eq!(doc["consumed"][1], "aws--blog-part2");
        assert!(doc["path"].as_str().unwrap().ends_with("cloud-migration.html"));
    }
}
