// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;

use anyhow::{anyhow, bail, Context, Result};
use the_carry_chain::config::{load_config, validate_config, Config};
use the_carry_chain::engine::LocalCluster;
use the_carry_chain::observability::logging::init_logging;

/// Command-line arguments after the program name.
struct Args {
    input: String,
    output: String,
    config: Option<String>,
    workers: Option<usize>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} <input> <output> [--config file.yaml] [--workers N]\n\
         Example: {} input.txt result.txt --workers 4",
        program, program
    )
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut workers = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| anyhow!("--config needs a file"))?;
                config = Some(path.clone());
            }
            "--workers" => {
                let count = iter.next().ok_or_else(|| anyhow!("--workers needs a number"))?;
                workers = Some(
                    count
                        .parse::<usize>()
                        .with_context(|| format!("invalid worker count '{}'", count))?,
                );
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            _ => positional.push(arg.clone()),
        }
    }

    let [input, output] = <[String; 2]>::try_from(positional)
        .map_err(|found| anyhow!("expected <input> <output>, found {} paths", found.len()))?;

    Ok(Args {
        input,
        output,
        config,
        workers,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let argv: Vec<String> = env::args().collect();
    let program = argv.first().map(String::as_str).unwrap_or("the-carry-chain");

    let args = match parse_args(argv.get(1..).unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n{}", e, usage(program));
            std::process::exit(2);
        }
    };

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }

    init_logging(&config.logging.level)?;

    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            tracing::error!("Invalid configuration: {}", error);
        }
        bail!("configuration rejected with {} error(s)", errors.len());
    }

    let cluster = LocalCluster::new(&config)?;
    let result = cluster
        .run_files(&args.input, &args.output)
        .await
        .with_context(|| format!("adding '{}' into '{}'", args.input, args.output))?;

    println!("{}", result.digits);
    Ok(())
}
