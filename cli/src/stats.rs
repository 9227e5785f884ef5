/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::GlobalArgs;
use anyhow::{Context, Result};
use clap::Parser;
use devrank::config::InitialRank;
use devrank::graph::DeveloperGraph;
use devrank::io::load_dump_with_logging;
use devrank::message::Channel;
use dsi_progress_logger::{ProgressLog, progress_logger};
use std::io::{BufReader, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "stats",
    about = "Prints statistics about a graph dump.",
    long_about = None
)]
pub struct CliArgs {
    /// The graph dump.
    pub graph: PathBuf,

    #[arg(long)]
    /// Print the statistics as a JSON object.
    pub json: bool,
}

/// Statistics about one channel of a developer graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStats {
    /// The number of distinct edges.
    pub arcs: usize,
    /// The sum of all edge weights.
    pub weight: u64,
    /// The number of developers with no out-edges.
    pub dangling: usize,
    /// The maximum number of distinct targets of a developer.
    pub max_targets: usize,
    /// The maximum total weight of a developer.
    pub max_weight: u64,
}

impl ChannelStats {
    pub fn new(graph: &DeveloperGraph, channel: Channel) -> Self {
        let mut stats = Self {
            arcs: 0,
            weight: 0,
            dangling: 0,
            max_targets: 0,
            max_weight: 0,
        };
        for vertex in graph.vertices() {
            let edges = vertex.edges(channel);
            stats.arcs += edges.len();
            stats.weight += edges.weight();
            stats.dangling += edges.is_empty() as usize;
            stats.max_targets = stats.max_targets.max(edges.len());
            stats.max_weight = stats.max_weight.max(edges.weight());
        }
        stats
    }

    fn to_json(self) -> serde_json::Value {
        serde_json::json!({
            "arcs": self.arcs,
            "weight": self.weight,
            "dangling": self.dangling,
            "max_targets": self.max_targets,
            "max_weight": self.max_weight,
        })
    }
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let mut pl = progress_logger![];
    pl.display_memory(true);
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let file = std::fs::File::open(&args.graph)
        .with_context(|| format!("Could not open {}", args.graph.display()))?;
    let graph = load_dump_with_logging(BufReader::new(file), &mut pl)
        .with_context(|| format!("Could not load graph dump from {}", args.graph.display()))?
        .build(InitialRank::Uniform)?;

    write_stats(std::io::stdout().lock(), &graph, args.json)
}

/// Writes the statistics of a graph, either as tab-separated key-value
/// lines or as a JSON object.
pub fn write_stats(mut writer: impl Write, graph: &DeveloperGraph, json: bool) -> Result<()> {
    let following = ChannelStats::new(graph, Channel::Following);
    let activity = ChannelStats::new(graph, Channel::Activity);

    if json {
        let stats = serde_json::json!({
            "developers": graph.num_developers(),
            "following": following.to_json(),
            "activity": activity.to_json(),
        });
        serde_json::to_writer_pretty(&mut writer, &stats)?;
        writeln!(writer)?;
    } else {
        writeln!(writer, "developers\t{}", graph.num_developers())?;
        for (channel, stats) in [(Channel::Following, following), (Channel::Activity, activity)] {
            writeln!(writer, "{channel}.arcs\t{}", stats.arcs)?;
            writeln!(writer, "{channel}.weight\t{}", stats.weight)?;
            writeln!(writer, "{channel}.dangling\t{}", stats.dangling)?;
            writeln!(writer, "{channel}.max_targets\t{}", stats.max_targets)?;
            writeln!(writer, "{channel}.max_weight\t{}", stats.max_weight)?;
        }
    }
    writer.flush()?;
    Ok(())
}
