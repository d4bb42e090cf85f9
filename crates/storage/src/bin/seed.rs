use chrono::{DateTime, Utc};
use clap::Parser;
use storage::repository::Storage;
use storage::seed::seed_screening;

/// Populate a database with the screening assessment and its question bank.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// `SQLite` connection URL.
    #[arg(long = "db", env = "DATABASE_URL", default_value = "sqlite:assess.sqlite3?mode=rwc")]
    db_url: String,

    /// Creation timestamp for seeded rows (RFC 3339). Defaults to now.
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let now = args.now.unwrap_or_else(Utc::now);

    let storage = Storage::sqlite(&args.db_url).await?;
    let existing = storage.assessments.list_assessments().await?;
    if !existing.is_empty() {
        println!(
            "{} already has {} assessment(s); skipping seed",
            args.db_url,
            existing.len()
        );
        return Ok(());
    }

    let id = seed_screening(&storage, now).await?;
    println!("Seeded assessment {id} into {}", args.db_url);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
