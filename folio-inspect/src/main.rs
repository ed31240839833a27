//! Folio content inspector
//!
//! Loads a serialized content item and runs one command against it.
//!
//! Usage:
//!   folio-inspect article.json get TitlePart.Title
//!   folio-inspect article.json --settings folio.toml --env development resolve Article.Body

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use folio_inspect::{load_item, run, Command};
use folio_query::{HostEnvironment, QueryLimits, QuerySettings};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "folio-inspect")]
#[command(about = "Inspect and edit Folio content item documents")]
struct Args {
    /// Path to the content item JSON document
    file: PathBuf,

    /// Path to the query settings file
    #[arg(short, long, default_value = "folio.toml")]
    settings: PathBuf,

    /// Host environment (development, staging, production)
    #[arg(short, long, default_value = "production")]
    env: HostEnvironment,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let limits = QueryLimits::new(QuerySettings::load_from(&args.settings), args.env);
    let item = load_item(&args.file)?;
    info!("Inspecting {} ({})", item.id(), item.content_type());

    let output = run(&args.command, &item, &limits)?;
    println!("{}", output);
    Ok(())
}
