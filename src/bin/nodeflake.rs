// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::Context;
use clap::Parser;
use nodeflake::{Config, base62};
use std::{fs, path::PathBuf, thread, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Mint or inspect Snowflake IDs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with generator settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    data_center_id: Option<u16>,

    #[arg(long)]
    machine_id: Option<u16>,

    /// Epoch in milliseconds since the Unix epoch.
    #[arg(long)]
    epoch_millis: Option<i64>,

    /// Number of IDs to generate.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Pause between two IDs.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Decode this ID (decimal, or base62 with --base62) instead of generating.
    #[arg(long)]
    decode: Option<String>,

    /// Print and read IDs in base62.
    #[arg(long)]
    base62: bool,

    /// Print the bit fields of every ID.
    #[arg(long)]
    table: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<Config>(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(data_center_id) = args.data_center_id {
        config.data_center_id = data_center_id;
    }
    if let Some(machine_id) = args.machine_id {
        config.machine_id = machine_id;
    }
    if let Some(epoch_millis) = args.epoch_millis {
        config.epoch_millis = epoch_millis;
    }

    let sf = config.finalize().context("building generator")?;

    if let Some(raw) = &args.decode {
        let id = if args.base62 {
            base62::decode(raw)?
        } else {
            raw.parse::<u64>().with_context(|| format!("`{raw}` is not an id"))?
        };
        let parts = sf.decompose(id);
        print!("{parts}");
        if let Some(at) = sf.timestamp_of(id) {
            println!("generated at: {}", at.to_rfc3339());
        }
        return Ok(());
    }

    info!(
        data_center_id = sf.data_center_id(),
        machine_id = sf.machine_id(),
        count = args.count,
        "generating ids"
    );
    for i in 0..args.count {
        let id = sf.next_id()?;
        if args.base62 {
            println!("{}", base62::encode(id));
        } else {
            println!("{id}");
        }
        if args.table {
            print!("{}", sf.decompose(id));
        }
        if args.delay_ms > 0 && i + 1 < args.count {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }
    Ok(())
}
