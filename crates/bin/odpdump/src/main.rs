use anyhow::Context as _;
use clap::Parser as _;
use odpdump::cmd;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    monitoring::init();

    if let Err(err) = run().await {
        odpdump::error!(err);
        std::process::exit(1);
    }
}

/// Back up Philadelphia open data tables
#[derive(Debug, clap::Parser)]
#[command(name = "odpdump")]
#[command(version)]
#[command(about = "odpdump splits open data tables into per-partition CSV files and a local SQLite store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Download a table with one CSV per distinct value of a column
    ///
    /// Resolves the distinct values of `--csv-split-col`, then fetches and writes each
    /// value's rows in turn. NULL is a partition of its own.
    ByCol(cmd::by_col::Args),

    /// Download a table with one CSV per year (or quarter, or month) of a date column
    ///
    /// Writes a `summary.json` with the column's first and last values and the row count of
    /// every partition before fetching any partition data.
    ByDatetime(cmd::by_datetime::Args),

    /// Write the first few rows of a table to one JSON file each
    SampleRows(cmd::sample_rows::Args),
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ByCol(args) => cmd::by_col::run(args)
            .await
            .context("failed to split table by column")?,
        Commands::ByDatetime(args) => cmd::by_datetime::run(args)
            .await
            .context("failed to split table by date")?,
        Commands::SampleRows(args) => cmd::sample_rows::run(args)
            .await
            .context("failed to sample table rows")?,
    }

    Ok(())
}
