/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! DevRank, a two-channel, superstep-bounded PageRank.
//!
//! Every developer has two ranks, one for the _following_ graph and one for
//! the _activity_ graph, which are computed independently and in lockstep
//! by the same [vertex program](DevRank).
//!
//! # The recurrence
//!
//! Let *k* be the superstep bound and α the damping factor (0.85 by
//! default). For each channel, let *w* be the sum of the weights of the
//! out-edges of a vertex on that channel. At superstep *s*:
//!
//! 1. if *s* > 0, the rank is updated as
//!
//!    > *r* ← (1 − α) / *w* + α ∑ *m*
//!
//!    where the sum ranges over the contributions *m* received on the
//!    channel;
//! 2. if *s* < *k*, every distinct target of the channel receives the
//!    contribution *r* / *w*; otherwise, the vertex votes to halt.
//!
//! Note that *w* is a sum of weights, but all targets receive the same
//! contribution, independently of the weight of the corresponding edge.
//!
//! # Degenerate channels
//!
//! For a channel with *w* = 0 the teleportation term (1 − α) / *w* is
//! undefined; it is taken to be zero, so the rank of the channel is α ∑ *m*.
//! Should an update nevertheless be non-finite, the rank is clamped to zero.
//! Both conditions are recorded in the [anomalies](Anomalies) of the vertex
//! and counted in the [diagnostics](DevRank::diagnostics) of the program.
//! Each run clears the anomalies of the graph first, so running twice on
//! the same graph reports the same diagnostics.

use crate::bsp::{Context, Engine, RunSummary, VertexProgram};
use crate::config::JobConfig;
use crate::graph::{Anomalies, DeveloperGraph, DeveloperVertex};
use crate::message::{Channel, Message, contributions};
use dsi_progress_logger::{ConcurrentProgressLog, ProgressLog, no_logging};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts of the anomalies detected during a run.
///
/// Each vertex and channel is counted at most once per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    /// Vertex channels with zero total weight that received an update.
    pub zero_weight: u64,
    /// Vertex channels whose update was not finite and was clamped.
    pub non_finite: u64,
}

/// The DevRank vertex program.
///
/// # Examples
///
/// ```
/// use devrank::prelude::*;
///
/// let mut builder = DeveloperGraphBuilder::new();
/// builder
///     .following("a", "b", 1)
///     .following("b", "c", 1)
///     .following("c", "a", 1);
/// let mut graph = builder.build(InitialRank::Uniform)?;
///
/// let devrank = DevRank::new(JobConfig::default());
/// let summary = devrank.run(&mut graph);
///
/// // Messages sent at superstep 9 are consumed at superstep 10
/// assert_eq!(summary.supersteps, 11);
/// for rank in graph.ranks() {
///     assert!(rank.following > 0.0);
///     // No activity edges, no activity rank
///     assert_eq!(rank.activity, 0.0);
/// }
/// # Ok::<(), devrank::config::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct DevRank {
    config: JobConfig,
    zero_weight: AtomicU64,
    non_finite: AtomicU64,
}

impl DevRank {
    /// Creates a new program.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is not [valid](JobConfig::validate).
    pub fn new(config: JobConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("{e}");
        }
        Self {
            config,
            zero_weight: AtomicU64::new(0),
            non_finite: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Returns the superstep bound *k*.
    pub fn max_supersteps(&self) -> u64 {
        self.config.max_supersteps
    }

    /// Returns the damping factor α.
    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    /// Returns the anomalies detected during the last run.
    pub fn diagnostics(&self) -> DiagnosticCounts {
        DiagnosticCounts {
            zero_weight: self.zero_weight.load(Ordering::Relaxed),
            non_finite: self.non_finite.load(Ordering::Relaxed),
        }
    }

    /// Computes DevRank on a graph, updating the ranks of its vertices.
    pub fn run(&self, graph: &mut DeveloperGraph) -> RunSummary {
        self.run_with_logging(graph, no_logging![], no_logging![])
    }

    /// Computes DevRank on a graph, updating the ranks of its vertices and
    /// logging progress.
    ///
    /// `pl` counts supersteps, `cpl` counts vertices within a superstep.
    pub fn run_with_logging(
        &self,
        graph: &mut DeveloperGraph,
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> RunSummary {
        log::info!("Superstep bound: {}", self.config.max_supersteps);
        log::info!("Alpha: {}", self.config.alpha);
        log::info!("Initial rank: {}", self.config.initial_rank);
        for channel in Channel::ALL {
            log::info!(
                "{} channel: {} arcs, {} developers with no out-edges",
                channel,
                graph.num_arcs(channel),
                graph.num_dangling(channel)
            );
        }

        // Counters and flags must agree, so both start afresh
        graph.clear_anomalies();
        self.zero_weight.store(0, Ordering::Relaxed);
        self.non_finite.store(0, Ordering::Relaxed);

        let summary = Engine::new(self)
            .granularity(self.config.granularity)
            .run_with_logging(graph.vertices_mut(), pl, cpl);

        log::info!(
            "Completed after {} superstep(s), {} messages",
            summary.supersteps,
            summary.messages
        );
        for channel in Channel::ALL {
            log::info!("Total {} rank: {}", channel, graph.total_rank(channel));
        }
        let diagnostics = self.diagnostics();
        if diagnostics.zero_weight > 0 {
            log::warn!(
                "{} zero-weight channel(s) updated with no teleportation term",
                diagnostics.zero_weight
            );
        }
        if diagnostics.non_finite > 0 {
            log::warn!(
                "{} non-finite rank update(s) clamped to zero",
                diagnostics.non_finite
            );
        }

        summary
    }

    /// Updates the rank of a channel with the sum of the received
    /// contributions.
    fn update_rank(&self, vertex: &mut DeveloperVertex, channel: Channel, contribution: f64) {
        let alpha = self.alpha();
        let weight = vertex.weight(channel);
        let teleport = if weight == 0 {
            if vertex.record_anomalies(Anomalies::zero_weight(channel)) {
                self.zero_weight.fetch_add(1, Ordering::Relaxed);
            }
            0.0
        } else {
            (1.0 - alpha) / weight as f64
        };

        let mut rank = teleport + alpha * contribution;
        if !rank.is_finite() {
            if vertex.record_anomalies(Anomalies::non_finite(channel)) {
                self.non_finite.fetch_add(1, Ordering::Relaxed);
            }
            rank = 0.0;
        }
        vertex.set_rank(channel, rank);
    }

    /// Sends the rank share of a channel to all its distinct targets.
    fn send_rank(ctx: &mut Context<'_, Message>, vertex: &DeveloperVertex, channel: Channel) {
        let edges = vertex.edges(channel);
        let value = match edges.weight() {
            0 => 0.0,
            weight => vertex.rank(channel) / weight as f64,
        };
        for target in edges.targets() {
            ctx.send_message(target, Message::new(channel, value));
        }
    }
}

impl VertexProgram for DevRank {
    type Vertex = DeveloperVertex;
    type Message = Message;

    fn compute(
        &self,
        ctx: &mut Context<'_, Message>,
        vertex: &mut DeveloperVertex,
        messages: &[Message],
    ) {
        let superstep = ctx.superstep();

        if superstep > 0 {
            let sums = contributions(messages);
            for (channel, contribution) in Channel::ALL.into_iter().zip(sums) {
                self.update_rank(vertex, channel, contribution);
            }
        }

        if superstep < self.max_supersteps() {
            for channel in Channel::ALL {
                Self::send_rank(ctx, vertex, channel);
            }
        } else {
            ctx.vote_to_halt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::Outbox;

    fn vertex(followings: &[(usize, u32)], activities: &[(usize, u32)], rank: f64) -> DeveloperVertex {
        DeveloperVertex::new(
            followings.iter().copied().collect(),
            activities.iter().copied().collect(),
            rank,
        )
    }

    fn compute(
        devrank: &DevRank,
        superstep: u64,
        vertex: &mut DeveloperVertex,
        messages: &[Message],
    ) -> (Vec<(usize, Message)>, bool) {
        let mut outbox = Outbox::new();
        let mut ctx = Context::new(superstep, 0, &mut outbox);
        devrank.compute(&mut ctx, vertex, messages);
        let halted = ctx.is_halted();
        (outbox.iter().map(|(t, m)| (t, *m)).collect(), halted)
    }

    #[test]
    fn test_fan_out_ignores_individual_weights() {
        let devrank = DevRank::new(JobConfig::default());
        // b = 1, c = 2
        let mut v = vertex(&[(1, 2), (2, 5)], &[], 0.4);
        let (sent, halted) = compute(&devrank, 0, &mut v, &[]);
        assert!(!halted);
        assert_eq!(sent.len(), 2);
        for (target, m) in &sent {
            assert!([1, 2].contains(target));
            assert_eq!(m.channel(), Channel::Following);
            assert_eq!(m.value(), 0.4 / 7.0);
        }
        assert!((sent[0].1.value() - 0.05714).abs() < 1E-5);
    }

    #[test]
    fn test_rank_update() {
        let devrank = DevRank::new(JobConfig::default());
        let mut v = vertex(&[(1, 4)], &[(1, 1)], 0.5);
        let messages = [
            Message::new(Channel::Following, 0.1),
            Message::new(Channel::Following, 0.2),
        ];
        compute(&devrank, 1, &mut v, &messages);
        assert!((v.following_rank() - 0.2925).abs() < 1E-12);
        // No activity contributions: only the teleportation term
        assert!((v.activity_rank() - 0.15).abs() < 1E-12);
    }

    #[test]
    fn test_superstep_zero_keeps_initial_ranks() {
        for k in [0, 1, 10] {
            let devrank = DevRank::new(JobConfig {
                max_supersteps: k,
                ..JobConfig::default()
            });
            let mut v = vertex(&[(1, 1)], &[(2, 2)], 0.3);
            let messages = [Message::new(Channel::Following, 0.9)];
            let (sent, halted) = compute(&devrank, 0, &mut v, &messages);
            assert_eq!(v.following_rank(), 0.3);
            assert_eq!(v.activity_rank(), 0.3);
            if k == 0 {
                assert!(halted);
                assert!(sent.is_empty());
            } else {
                assert!(!halted);
                assert_eq!(sent.len(), 2);
                assert!(sent.contains(&(1, Message::new(Channel::Following, 0.3))));
                assert!(sent.contains(&(2, Message::new(Channel::Activity, 0.15))));
            }
        }
    }

    #[test]
    fn test_halting() {
        let devrank = DevRank::new(JobConfig::default());
        let mut v = vertex(&[(1, 1)], &[(1, 1)], 0.5);

        let (sent, halted) = compute(&devrank, 9, &mut v, &[]);
        assert!(!halted);
        assert_eq!(sent.len(), 2);

        let (sent, halted) = compute(&devrank, 10, &mut v, &[]);
        assert!(halted);
        assert!(sent.is_empty());
    }

    #[test]
    fn test_zero_weight_channel() {
        let devrank = DevRank::new(JobConfig::default());
        let mut v = vertex(&[(1, 1)], &[], 0.5);

        let (sent, _) = compute(&devrank, 0, &mut v, &[]);
        assert!(sent.iter().all(|(_, m)| m.channel() == Channel::Following));

        for superstep in 1..5 {
            let messages = [Message::new(Channel::Activity, 0.2)];
            let (sent, _) = compute(&devrank, superstep, &mut v, &messages);
            assert!(sent.iter().all(|(_, m)| m.channel() == Channel::Following));
            assert!(v.activity_rank().is_finite());
            assert!((v.activity_rank() - 0.85 * 0.2).abs() < 1E-12);
        }
        assert_eq!(v.anomalies(), Anomalies::ZERO_ACTIVITY_WEIGHT);
        // Counted once per vertex channel
        assert_eq!(
            devrank.diagnostics(),
            DiagnosticCounts {
                zero_weight: 1,
                non_finite: 0
            }
        );

        let mut isolated = vertex(&[], &[], 0.5);
        compute(&devrank, 1, &mut isolated, &[]);
        assert_eq!(isolated.following_rank(), 0.0);
        assert_eq!(isolated.activity_rank(), 0.0);
        assert_eq!(devrank.diagnostics().zero_weight, 3);
    }

    #[test]
    fn test_non_finite_clamped() {
        let devrank = DevRank::new(JobConfig::default());
        let mut v = vertex(&[(1, 1)], &[(1, 1)], 0.5);
        let messages = [
            Message::new(Channel::Following, f64::INFINITY),
            Message::new(Channel::Activity, f64::NAN),
        ];
        let (sent, _) = compute(&devrank, 1, &mut v, &messages);
        assert_eq!(v.following_rank(), 0.0);
        assert_eq!(v.activity_rank(), 0.0);
        assert!(sent.iter().all(|(_, m)| m.value().is_finite()));
        assert_eq!(
            v.anomalies(),
            Anomalies::NON_FINITE_FOLLOWING | Anomalies::NON_FINITE_ACTIVITY
        );
        assert_eq!(devrank.diagnostics().non_finite, 2);
    }

    #[test]
    fn test_custom_alpha() {
        let devrank = DevRank::new(JobConfig {
            alpha: 0.5,
            ..JobConfig::default()
        });
        assert_eq!(devrank.alpha(), 0.5);
        assert_eq!(devrank.max_supersteps(), 10);
        let mut v = vertex(&[(1, 2)], &[], 0.5);
        compute(&devrank, 1, &mut v, &[Message::new(Channel::Following, 0.4)]);
        assert!((v.following_rank() - (0.25 + 0.2)).abs() < 1E-12);
    }

    #[test]
    #[should_panic]
    fn test_invalid_config() {
        DevRank::new(JobConfig {
            alpha: 1.5,
            ..JobConfig::default()
        });
    }
}
