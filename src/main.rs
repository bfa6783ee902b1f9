use anyhow::{Context, Result};
use clap::Parser;

use s3_suffix_walk::{build_client, list_matching_objects};

mod cli;

use cli::{init_logging, Args};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level)?;

    let client = build_client(&args.client_config()).await;

    let matches = list_matching_objects(
        &client,
        &args.bucket,
        &args.prefix,
        &args.suffix_set(),
        &args.walk_options(),
    )
    .await
    .with_context(|| format!("failed to walk s3://{}/{}", args.bucket, args.prefix))?;

    for record in &matches {
        println!("{record}");
    }

    eprintln!("Found {} matching objects", matches.len());
    Ok(())
}
