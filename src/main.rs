use clap::{Parser, Subcommand};
use content_index::config;
use content_index::index::CategoryIndex;
use content_index::output::{self, Mode, Summary};
use content_index::pipeline;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "content-index")]
#[command(about = "Validate post frontmatter and build the manifest and category index")]
#[command(long_about = "\
Validate post frontmatter and build the manifest and category index

Every index.md under the content directory is a post. Its frontmatter is
checked against the schema and summarized into two files read by the site
renderer.

Content structure:

  content/
  ├── reviews/
  │   └── claude-code/
  │       ├── index.md             # ---, key: value lines, ---, then Markdown
  │       └── cover.jpg            # Sibling assets → \"files\" in the manifest
  └── guides/
      └── context-windows/
          └── index.md

Outputs (relative to --root):
  manifest.jsonl    One JSON object per post, newest first
  categories.json   Category → article summaries

Exit status is 1 when the content directory is missing or any post has
errors; both files are still written in the latter case.

Run 'content-index gen-config' to print a documented content-index.toml.")]
#[command(version)]
struct Cli {
    /// Project root; content and output paths are relative to it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/content-index.toml, optional)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate posts and write manifest.jsonl and categories.json
    Build,
    /// Validate posts without writing anything
    Check,
    /// Print a stock content-index.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            println!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.root, cli.config.as_deref())?;
            let outcome = pipeline::build(&config)?;
            let collection = &outcome.collection;

            output::print_errors(&collection.errors);
            output::print_generated(
                &config.manifest.display().to_string(),
                outcome.manifest_entries,
                "articles",
            );
            output::print_generated(
                &config.categories.display().to_string(),
                outcome.categories,
                "categories",
            );
            output::print_summary(
                &Summary {
                    scanned: collection.scanned,
                    articles: collection.articles.len(),
                    categories: outcome.categories,
                    errors: collection.errors.len(),
                },
                Mode::Build,
            );
            Ok(exit_status(outcome.is_clean()))
        }
        Command::Check => {
            let config = config::load_config(&cli.root, cli.config.as_deref())?;
            println!("==> Checking {}", config.content_root().display());
            let collection = pipeline::check(&config)?;
            let categories =
                CategoryIndex::build(&collection, &config.schema.fallback_category).len();

            output::print_errors(&collection.errors);
            output::print_summary(
                &Summary {
                    scanned: collection.scanned,
                    articles: collection.articles.len(),
                    categories,
                    errors: collection.errors.len(),
                },
                Mode::Check,
            );
            Ok(exit_status(collection.is_clean()))
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Logs go to stderr so stdout stays the report.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_status(clean: bool) -> ExitCode {
    if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
