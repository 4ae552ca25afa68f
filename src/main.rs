use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use talkcast::{
    BuildEvent, BuildReporter, FeedResolver, NoopReporter, ReqwestClient, SharedBuildReporter,
    SiteConfig, build_site, revalidate,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static PAGE: Emoji<'_, '_> = Emoji("📄 ", "[>] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static SLEEP: Emoji<'_, '_> = Emoji("💤 ", "[=] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Generate the static podcast site from an RSS feed
#[derive(Parser, Debug)]
#[command(name = "talkcast")]
#[command(about = "Generate a static podcast site from an RSS feed")]
#[command(version)]
struct Args {
    /// Output directory for the generated pages
    output_dir: PathBuf,

    /// RSS feed URL (overrides the config file)
    #[arg(short, long)]
    feed: Option<String>,

    /// JSON file with site settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep running and regenerate whenever the feed changes
    #[arg(short, long)]
    watch: bool,

    /// Seconds between feed checks in watch mode (overrides the config file)
    #[arg(short, long)]
    revalidate: Option<u64>,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output
struct SpinnerReporter {
    bar: ProgressBar,
}

impl SpinnerReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { bar }
    }
}

impl BuildReporter for SpinnerReporter {
    fn report(&self, event: BuildEvent) {
        match event {
            BuildEvent::FetchingFeed { url } => {
                self.bar
                    .set_message(format!("{SEARCH}Fetching feed: {}", url.cyan()));
            }

            BuildEvent::FeedResolved { episodes } => {
                self.bar.set_message(format!(
                    "{HEADPHONES}{} episodes in feed",
                    episodes.to_string().cyan()
                ));
            }

            BuildEvent::FeedUnchanged { .. } => {
                self.bar
                    .set_message(format!("{SLEEP}{}", "Feed unchanged, waiting".dimmed()));
            }

            BuildEvent::PageWritten { route, .. } => {
                self.bar.set_message(format!("{PAGE}Wrote {}", route.cyan()));
            }

            BuildEvent::PageRemoved { route } => {
                self.bar
                    .println(format!("  {} {}", "Removed".yellow(), route.yellow()));
            }

            BuildEvent::BuildCompleted {
                pages_written,
                episodes,
            } => {
                self.bar.println(format!(
                    "{SUCCESS}{} {} pages for {} episodes",
                    "Site generated:".bold().green(),
                    pages_written.to_string().green().bold(),
                    episodes.to_string().cyan()
                ));
            }

            BuildEvent::RevalidationFailed { error } => {
                self.bar.println(format!(
                    "{FAILURE}{} {}",
                    "Revalidation failed:".red().bold(),
                    error.dimmed()
                ));
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn load_config(args: &Args) -> Result<SiteConfig> {
    let mut config = match &args.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => SiteConfig::default(),
    };

    if let Some(feed) = &args.feed {
        config.feed_url = feed.clone();
    }
    if let Some(secs) = args.revalidate {
        config.revalidate_secs = secs;
    }

    config.validate().context("Invalid site configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "talkcast".bold().magenta(),
            "- Podcast Site Generator".dimmed()
        );
    }

    let resolver = FeedResolver::new(ReqwestClient::new(), &config.feed_url)
        .context("Failed to set up feed resolver")?;

    let reporter: SharedBuildReporter = if args.quiet {
        NoopReporter::shared()
    } else {
        Arc::new(SpinnerReporter::new())
    };

    if args.watch {
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        let summary = revalidate(&resolver, &config, &args.output_dir, &reporter, shutdown)
            .await
            .context("Failed to start revalidation")?;

        if !args.quiet {
            println!(
                "\n{} {} rebuilds, {} unchanged, {} failed",
                "Stopped:".bold(),
                summary.rebuilds.to_string().green(),
                summary.unchanged.to_string().yellow(),
                summary.failures.to_string().red()
            );
        }
    } else {
        build_site(&resolver, &config, &args.output_dir, &reporter)
            .await
            .context("Failed to generate site")?;
    }

    if !args.quiet {
        println!(
            "\n{FOLDER}Output: {}\n",
            args.output_dir.display().to_string().cyan()
        );
    }

    Ok(())
}
