use std::path::PathBuf;

use boardsheet::email::DEFAULT_DOMAIN;
use boardsheet::migrate::{self, MigrationOptions, MigrationReport};
use boardsheet::sheets::DryRunService;
use boardsheet::{MigrateError, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_tracing()?;
    match cli.command {
        Command::Migrate(args) => execute_migrate(args),
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| MigrateError::Logging(error.to_string()))
}

fn execute_migrate(args: MigrateArgs) -> Result<()> {
    if !args.input.exists() {
        return Err(MigrateError::MissingInput(args.input));
    }
    if let Some(mapping) = &args.mapping {
        if !mapping.exists() {
            return Err(MigrateError::MissingInput(mapping.clone()));
        }
    }

    let options = MigrationOptions {
        mapping: args.mapping,
        email_domain: args.email_domain,
    };

    let mut service = DryRunService::default();
    let report = migrate::migrate_board(&args.input, &options, &mut service)?;

    if let Some(preview) = &args.preview {
        service.write_preview(preview)?;
        println!("Preview written to {}", preview.display());
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &MigrationReport) {
    println!("Migration complete");
    println!("  Sheet ID:    {}", report.sheet_id);
    println!("  Sheet name:  {}", report.sheet_name);
    println!("  Rows:        {}", report.rows_created);
    println!(
        "  Discussions: {} of {} created",
        report.discussions_created, report.discussions_attempted
    );
    for failure in &report.discussion_failures {
        println!("    failed on card {}: {}", failure.card_id, failure.reason);
    }
    println!();
    println!("Next steps:");
    println!("  1. Open the sheet in the sheet service");
    println!("  2. Switch to card view");
    println!("  3. Set 'List' as the lane field");
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Migrate a Trello board export into a collaboration sheet."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the migration pipeline against an in-memory sheet recorder.
    Migrate(MigrateArgs),
}

#[derive(clap::Args)]
struct MigrateArgs {
    /// Trello board export (JSON).
    input: PathBuf,

    /// Optional name -> email mapping workbook (.xlsx, two columns).
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Domain used when generating addresses from member names.
    #[arg(long, default_value = DEFAULT_DOMAIN)]
    email_domain: String,

    /// Write the recorded sheet (schema, rows, discussions) as JSON.
    #[arg(long)]
    preview: Option<PathBuf>,
}
