use clap::Parser;
use microannotate::config::Config;
use microannotate::paths::PlatformPaths;
use microannotate::{AnnotateError, RevisionRange, RevisionSelector, generate_with_config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "microannotate")]
#[command(author, version, about = "Replay a git history with one token per line for fine-grained blame")]
struct Args {
    /// Path to the source git repository
    source: PathBuf,

    /// Path of the destination repository to create
    dest: PathBuf,

    /// First revision to replay: 0-based index or revision id
    #[arg(long, default_value = "0")]
    rev_start: RevisionSelector,

    /// Last revision to replay: revision id, index, or "latest"
    #[arg(long, default_value = "latest")]
    rev_end: RevisionSelector,

    /// Replay at most this many revisions
    #[arg(long)]
    limit: Option<usize>,

    /// Write one token per line
    #[arg(long)]
    tokenize: bool,

    /// Strip comments before anything else
    #[arg(long)]
    remove_comments: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, env = "MICROANNOTATE_CONFIG")]
    config: Option<PathBuf>,

    /// Write the effective configuration to the configuration file before replaying
    #[arg(long)]
    save_config: bool,
}

fn run(args: Args) -> Result<(), AnnotateError> {
    let mut config = match &args.config {
        Some(path) if args.save_config && !path.exists() => {
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
        path => Config::load(path.as_deref())?,
    };
    config.transform.tokenize |= args.tokenize;
    config.transform.remove_comments |= args.remove_comments;

    if args.save_config {
        let path = args
            .config
            .clone()
            .unwrap_or_else(PlatformPaths::default_config_path);
        config.save(&path)?;
    }

    let range = RevisionRange {
        start: args.rev_start,
        end: args.rev_end,
        limit: args.limit,
    };

    let replayed = generate_with_config(&args.source, &args.dest, &range, &config)?;

    println!(
        "Replayed {} revisions into {}",
        replayed.len(),
        args.dest.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            // Bad ranges and bad configuration are usage errors
            if e.is_user_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
