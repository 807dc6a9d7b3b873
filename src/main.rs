//! dev-standup - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dev_standup::config::{Config, Provider};
use dev_standup::llm::Mood;
use dev_standup::standup::{StandupOptions, StandupReport, run_standup};

/// Generate a standup summary from your recent git commits.
///
/// By default scans the repository in the current directory for your
/// commits from the last 24 hours.
#[derive(Parser, Debug)]
#[command(name = "dev-standup")]
#[command(about = "Generate AI-powered standup summaries from git commits")]
#[command(version)]
struct Cli {
    /// Tone of the summary
    #[arg(long, value_enum, ignore_case = true)]
    mood: Option<Mood>,

    /// Number of hours to look back (default from DEFAULT_HOURS, else 24)
    #[arg(long)]
    hours: Option<u32>,

    /// Scan every git repository under the target directory
    #[arg(long)]
    all_repos: bool,

    /// GitHub repository URL or local path to scan
    #[arg(long)]
    repo: Option<String>,

    /// LLM provider to use (overrides LLM_PROVIDER)
    #[arg(long, value_enum, ignore_case = true)]
    provider: Option<Provider>,

    /// Include commits from all authors (default: only yours)
    #[arg(long)]
    all_authors: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Values already in the environment take precedence over .env
    dotenv::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(provider) = cli.provider {
        config = config.with_provider(provider);
    }

    let defaults = StandupOptions::from_config(&config);
    let options = StandupOptions {
        mood: cli.mood.unwrap_or(defaults.mood),
        hours: cli.hours.unwrap_or(defaults.hours),
        all_repos: cli.all_repos,
        repo: cli.repo,
        all_authors: cli.all_authors,
    };

    println!(
        "Scanning commits from the last {} hours ({} mode)...",
        options.hours, options.mood
    );

    let report = run_standup(&config, &options)
        .await
        .context("Could not generate standup")?;

    print_report(&report, &options);
    Ok(())
}

/// Print the summaries, or hints when nothing was found.
fn print_report(report: &StandupReport, options: &StandupOptions) {
    if report.is_empty() {
        if options.all_repos {
            println!(
                "No git repositories with recent commits found under {}.",
                report.target_name
            );
            println!("Try: increase the time range with --hours");
        } else {
            println!(
                "No commits found in {} in the last {} hours.",
                report.target_name, options.hours
            );
            println!("Tips:");
            println!("  --hours 48     look further back");
            println!("  --all-authors  include everyone's commits");
            println!("  --all-repos    scan every repository below this directory");
        }
        return;
    }

    println!(
        "Provider: {} | Mood: {}\n",
        report.provider.as_str().to_uppercase(),
        options.mood.as_str().to_uppercase()
    );
    println!("=== STANDUP SUMMARY ===");

    let multiple = report.summaries.len() > 1;
    for repo in &report.summaries {
        if multiple {
            println!("\n--- {} ({} commits) ---", repo.name, repo.commit_count);
        }
        println!("\n{}\n", repo.summary);
    }

    println!("Ready for standup!");
}
