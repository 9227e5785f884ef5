/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::{ChannelArg, GlobalArgs, NumThreadsArg, RankFormatArg, get_thread_pool};
use anyhow::{Context, Result};
use clap::Parser;
use devrank::config::{InitialRank, JobConfig, parse_max_supersteps};
use devrank::io::{RankFormat, load_dump_with_logging, sort_ranks};
use devrank::rank::DevRank;
use dsi_progress_logger::{ProgressLog, concurrent_progress_logger, progress_logger};
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "run",
    about = "Computes DevRank on a graph dump.",
    long_about = None
)]
pub struct CliArgs {
    /// The graph dump.
    pub graph: PathBuf,

    #[arg(short, long)]
    /// Where to store the ranks (default: standard output).
    pub output: Option<PathBuf>,

    #[arg(short, long)]
    /// A .properties file with the job parameters; command-line options
    /// override its values.
    pub properties: Option<PathBuf>,

    #[arg(short = 'k', long, value_parser = parse_max_supersteps)]
    /// The superstep bound: ranks are updated at supersteps 1 . . k (default: 10).
    pub supersteps: Option<u64>,

    #[arg(short, long)]
    /// The damping factor α, in the interval [0 . . 1) (default: 0.85).
    pub alpha: Option<f64>,

    #[arg(long)]
    /// The initial rank: "uniform" (1/n) or a value in (0 . . 1] (default: uniform).
    pub initial_rank: Option<InitialRank>,

    #[arg(long, value_enum, default_value_t = RankFormatArg::Tsv)]
    /// The output format for the ranks.
    pub fmt: RankFormatArg,

    #[arg(long)]
    /// Decimal digits for the ranks.
    pub precision: Option<usize>,

    #[arg(long, value_enum)]
    /// Sort developers by decreasing rank on this channel.
    pub sort_by: Option<ChannelArg>,

    #[arg(long, requires = "sort_by")]
    /// Output only the first developers after sorting.
    pub top: Option<usize>,

    #[arg(long)]
    /// The number of vertices computed by a parallel task (advanced option).
    pub granularity: Option<usize>,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

impl CliArgs {
    /// Returns the job configuration, starting from the properties file, if
    /// any, and applying the command-line overrides.
    pub fn job_config(&self) -> Result<JobConfig> {
        let mut config = match &self.properties {
            Some(path) => JobConfig::load(path)?,
            None => JobConfig::default(),
        };
        if let Some(supersteps) = self.supersteps {
            config.max_supersteps = supersteps;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(initial_rank) = self.initial_rank {
            config.initial_rank = initial_rank;
        }
        if let Some(granularity) = self.granularity {
            config.granularity = granularity;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let config = args.job_config()?;

    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut cpl = concurrent_progress_logger![];
    cpl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        cpl.log_interval(log_interval);
    }

    let thread_pool = get_thread_pool(args.num_threads.num_threads)?;

    log::info!("Loading the graph dump from {}", args.graph.display());
    let file = std::fs::File::open(&args.graph)
        .with_context(|| format!("Could not open {}", args.graph.display()))?;
    let builder = load_dump_with_logging(BufReader::new(file), &mut pl)
        .with_context(|| format!("Could not load graph dump from {}", args.graph.display()))?;
    let mut graph = builder.build(config.initial_rank)?;

    let devrank = DevRank::new(config);
    thread_pool.install(|| devrank.run_with_logging(&mut graph, &mut pl, &mut cpl));

    let mut ranks = graph.ranks().collect::<Vec<_>>();
    if let Some(channel) = args.sort_by {
        sort_ranks(&mut ranks, channel.into());
    }
    if let Some(top) = args.top {
        ranks.truncate(top);
    }

    let fmt = RankFormat::from(args.fmt);
    match &args.output {
        Some(path) => fmt.store(path, &ranks, args.precision)?,
        None => fmt.write(std::io::stdout().lock(), &ranks, args.precision)?,
    }

    Ok(())
}
