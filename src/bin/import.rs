use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use restaurants::{
    database::{DEFAULT_KEY, init_redis, load_chains},
    models::Chain,
};

/// Loads a JSON array of restaurant chain documents into Redis.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    file: PathBuf,

    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    #[arg(long, env = "RESTAURANTS_KEY", default_value = DEFAULT_KEY)]
    key: String,

    /// Drop existing chains in the same transaction as the load.
    #[arg(long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let chains: Vec<Chain> = serde_json::from_slice(&data)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    let restaurant_count: usize = chains.iter().map(|chain| chain.restaurants.len()).sum();
    println!("Loaded Chains: {}", chains.len());
    println!("Loaded Restaurants: {}\n", restaurant_count);

    let mut connection = init_redis(&args.redis_url).await?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {msg}",
    )?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Writing {} chains to {}", chains.len(), args.key));

    load_chains(&mut connection, &args.key, &chains, args.replace).await?;

    pb.finish_with_message("Done");

    if args.replace {
        println!("Replaced {}", args.key);
    }
    println!("\n{} documents were inserted.", chains.len());
    println!("{} restaurants were inserted.", restaurant_count);

    Ok(())
}
