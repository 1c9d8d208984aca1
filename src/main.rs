use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use semver::Version;
use tracing_subscriber::EnvFilter;

use git_monotag::cli::{self, IncrementArgs, StatusArgs, TagsArgs};
use git_monotag::domain::VersionBump;
use git_monotag::repo::Repo;
use git_monotag::ui;

/// Environment variable holding the log filter, e.g. `git_monotag=debug`.
const LOG_ENV: &str = "GIT_MONOTAG_LOG";

#[derive(Parser)]
#[command(
    name = "git-monotag",
    version,
    about = "Track and create per-project semantic version tags in a monorepo"
)]
struct Args {
    #[arg(short, long, default_value = ".", help = "Directory inside the repository")]
    repo_dir: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Log debug output to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the projects with their index
    List,

    /// Show the tag history of each project
    Tags {
        #[arg(short, long = "project", help = "Project name, index or #index (repeatable)")]
        projects: Vec<String>,

        #[arg(long, help = "Include prerelease tags")]
        pre: bool,

        #[arg(short, long, help = "Maximum number of tags per project")]
        depth: Option<usize>,

        #[arg(long, help = "Oldest version to show")]
        from: Option<Version>,

        #[arg(long, help = "Newest version to show")]
        to: Option<Version>,
    },

    /// Changes of each project since its latest tag up to the branch tip
    Status {
        #[arg(help = "Project names, indexes or #indexes; all projects when omitted")]
        projects: Vec<String>,

        #[arg(long, help = "Compare with the latest tag even if it is a prerelease")]
        pre: bool,

        #[arg(short, long = "summary-only", help = "List only the project and change summary")]
        summary_only: bool,

        #[arg(short = 'f', long = "show-files", help = "List all files changed within each project")]
        show_files: bool,

        #[arg(short = 'c', long = "show-commits", help = "List all commits within each project")]
        show_commits: bool,

        #[arg(short, long, help = "Offer to increment each changed project")]
        interactive: bool,
    },

    /// Tag the branch tip with the next version of a project
    Increment {
        #[arg(help = "Project name, index or #index")]
        project: String,

        #[arg(help = "major, minor or patch")]
        bump: VersionBump,

        #[arg(long, help = "Push the new tag to the configured remote")]
        push: bool,

        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompts")]
        yes: bool,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut repo = Repo::open(&args.repo_dir, args.config.as_deref()).with_context(|| {
        format!("Failed to open repository at '{}'", args.repo_dir.display())
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::List => cli::run_list(&repo, &mut out),
        Command::Tags {
            projects,
            pre,
            depth,
            from,
            to,
        } => {
            let tags_args = TagsArgs {
                projects,
                include_prerelease: pre,
                depth,
                from,
                to,
            };
            cli::run_tags(&repo, &tags_args, &mut out)
        }
        Command::Status {
            projects,
            pre,
            summary_only,
            show_files,
            show_commits,
            interactive,
        } => {
            let status_args = StatusArgs {
                projects,
                include_prerelease: pre,
                summary_only,
                show_files,
                show_commits,
                interactive,
            };
            cli::run_status(&mut repo, &status_args, &mut out)
        }
        Command::Increment {
            project,
            bump,
            push,
            yes,
        } => {
            let increment_args = IncrementArgs {
                project,
                bump,
                push,
                yes,
            };
            cli::run_increment(&mut repo, &increment_args).map(|_| ())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
