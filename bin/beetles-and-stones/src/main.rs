/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::io::{BufWriter, Write};

use anyhow::{bail, Result};
use beetles_and_stones::simulation::{StoneLine, TieBreak};
use beetles_and_stones::{solve, Gaps};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

const LARGE_STONES: u64 = 1_000_000_001;
const LARGE_BEETLES: u64 = 123_456_789;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Tab separated lines.
    #[default]
    Text,

    /// One JSON object per line.
    Json,
}

/// Beetles hide under a line of stones, each as far as possible from its neighbours and the
/// ends of the line. Prints how many free stones are left and right of the last beetle.
#[derive(Debug, Parser)]
#[command(name = "beetles-and-stones", version)]
struct Args {
    /// Stones in the line.
    #[arg(long, default_value_t = 1000)]
    stones: u64,

    /// Print rows for 1..=N beetles. Defaults to the number of stones.
    #[arg(long)]
    max_beetles: Option<u64>,

    /// Skip the 1000000001 stones, 123456789 beetles example.
    #[arg(long)]
    no_large_example: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Check every row against a step by step simulation before printing. The large example is
    /// not checked, simulating it is too slow.
    #[arg(long)]
    verify: bool,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DemoConfig {
    stones: u64,
    max_beetles: u64,
    large_example: Option<(u64, u64)>,
    format: OutputFormat,
    verify: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            stones: 1000,
            max_beetles: 1000,
            large_example: Some((LARGE_STONES, LARGE_BEETLES)),
            format: OutputFormat::Text,
            verify: false,
        }
    }
}

impl From<&Args> for DemoConfig {
    fn from(args: &Args) -> Self {
        Self {
            stones: args.stones,
            max_beetles: args.max_beetles.unwrap_or(args.stones),
            large_example: if args.no_large_example {
                None
            } else {
                Some((LARGE_STONES, LARGE_BEETLES))
            },
            format: args.format,
            verify: args.verify,
        }
    }
}

#[derive(Debug, Serialize)]
struct Row {
    #[serde(skip_serializing_if = "Option::is_none")]
    stones: Option<u64>,
    beetles: u64,
    left: u64,
    right: u64,
}

impl Row {
    fn new(stones: Option<u64>, beetles: u64, gaps: Gaps<u64>) -> Self {
        Self {
            stones,
            beetles,
            left: gaps.left,
            right: gaps.right,
        }
    }
}

fn run<W: Write>(config: &DemoConfig, out: &mut W) -> Result<()> {
    for beetles in 1..=config.max_beetles {
        let gaps = solve(config.stones, beetles);
        match config.format {
            OutputFormat::Text => writeln!(out, "Beetles: {}\t{}", beetles, gaps)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &Row::new(None, beetles, gaps))?;
                writeln!(out)?;
            }
        }
    }

    if let Some((stones, beetles)) = config.large_example {
        let gaps = solve(stones, beetles);
        match config.format {
            OutputFormat::Text => {
                writeln!(out, "\nLarge numbers test")?;
                writeln!(out, "Stones: {}\tBeetles: {}\t{}", stones, beetles, gaps)?;
            }
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, &Row::new(Some(stones), beetles, gaps))?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

// One simulation yields the answer for every beetle count at once, so only the comparison is
// spread over threads. The line is only simulated as far as the last printed row.
fn verify(stones: u64, max_beetles: u64) -> Result<()> {
    let simulated: Vec<Gaps<u64>> = StoneLine::new(stones, TieBreak::Leftmost)
        .take(usize::try_from(max_beetles).unwrap_or(usize::MAX))
        .map(|placement| placement.gaps)
        .collect();
    debug!(stones, placements = simulated.len(), "simulated line");

    let mut mismatches: Vec<u64> = (1..=max_beetles)
        .into_par_iter()
        .filter(|&beetles| {
            let expected = usize::try_from(beetles - 1)
                .ok()
                .and_then(|index| simulated.get(index))
                .copied()
                .unwrap_or_else(Gaps::sentinel);
            solve(stones, beetles) != expected
        })
        .collect();
    mismatches.sort_unstable();

    if let Some(first) = mismatches.first() {
        bail!(
            "closed form disagrees with simulation for {} of {} beetle counts, first at {} beetles",
            mismatches.len(),
            max_beetles,
            first
        );
    }
    info!(stones, max_beetles, "closed form matches simulation");
    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    let config = DemoConfig::from(&args);
    debug!(?config, "starting");

    if config.verify {
        verify(config.stones, config.max_beetles)?;
    }

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}
