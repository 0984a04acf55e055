//! Recompute stored exercise calorie estimates with the current settings
//! Usage: cargo run --bin recalculate_estimates -- <start> [end] [exercise]

use fitlog::config::Config;
use fitlog::db::Database;
use fitlog::tools::exercise;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let Some(start) = args.get(1) else {
        eprintln!("Usage: recalculate_estimates <start YYYY-MM-DD> [end YYYY-MM-DD] [exercise]");
        std::process::exit(2);
    };
    let end = args.get(2).unwrap_or(start);
    let exercise_key = args.get(3).map(|s| s.as_str());

    let config = Config::from_env()?;
    println!("Database: {}", config.database_path.display());

    let database = Database::open(&config)?;

    let result = exercise::recalculate_estimates(&database, start, end, exercise_key)?;
    println!(
        "{} to {}: examined {} sets, updated {}",
        result.start, result.end, result.examined, result.updated
    );

    Ok(())
}
