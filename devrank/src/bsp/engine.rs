/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Context, Mailbox, Outbox, SuperstepBarrier, VertexProgram};
use dsi_progress_logger::{ConcurrentProgressLog, ProgressLog, no_logging};
use rayon::prelude::*;

/// Statistics about a superstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperstepStats {
    pub superstep: u64,
    /// The number of vertices computed.
    pub active: usize,
    /// The number of vertices that did not vote to halt.
    pub running: usize,
    /// The number of messages sent.
    pub messages: usize,
}

/// The outcome of a run of an [`Engine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// The number of supersteps executed.
    pub supersteps: u64,
    /// The total number of messages sent.
    pub messages: u64,
    /// Per-superstep statistics.
    pub stats: Vec<SuperstepStats>,
}

/// Executes a [`VertexProgram`] on a slice of vertices.
///
/// Vertices are identified by their index in the slice. The engine is
/// configured via setters and then executed via [`run`](Self::run) or
/// [`run_with_logging`](Self::run_with_logging); the computation uses the
/// current Rayon thread pool, so it can be confined to a specific pool using
/// [`ThreadPool::install`](rayon::ThreadPool::install).
#[derive(Debug)]
pub struct Engine<'a, P: VertexProgram> {
    program: &'a P,
    granularity: usize,
}

impl<'a, P: VertexProgram> Engine<'a, P> {
    pub const DEFAULT_GRANULARITY: usize = 1000;

    pub fn new(program: &'a P) -> Self {
        Self {
            program,
            granularity: Self::DEFAULT_GRANULARITY,
        }
    }

    /// Sets the number of vertices passed to a Rayon task at a time.
    ///
    /// # Panics
    ///
    /// Panics if `granularity` is zero.
    pub fn granularity(&mut self, granularity: usize) -> &mut Self {
        assert!(granularity > 0, "The granularity must be positive");
        self.granularity = granularity;
        self
    }

    /// Runs the program until all vertices have voted to halt and no
    /// messages are in flight.
    pub fn run(&self, vertices: &mut [P::Vertex]) -> RunSummary {
        self.run_with_logging(vertices, no_logging![], no_logging![])
    }

    /// Runs the program until all vertices have voted to halt and no
    /// messages are in flight, logging progress.
    ///
    /// `pl` counts supersteps; `cpl` counts vertices within each
    /// superstep.
    pub fn run_with_logging(
        &self,
        vertices: &mut [P::Vertex],
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> RunSummary {
        let n = vertices.len();
        let granularity = self.granularity;
        let mut halted = vec![false; n].into_boxed_slice();
        let mut inbox = Mailbox::empty(n);
        let barrier = SuperstepBarrier::new();
        let mut summary = RunSummary::default();

        pl.item_name("superstep");
        pl.expected_updates(None);
        pl.start(format!(
            "Running supersteps on {n} vertices (granularity={granularity})..."
        ));

        loop {
            let superstep = barrier.generation();
            let active = (0..n)
                .filter(|&i| !halted[i] || inbox.has_messages(i))
                .count();
            if active == 0 {
                break;
            }

            cpl.item_name("vertex");
            cpl.expected_updates(Some(n));
            cpl.start(format!("Superstep {superstep}..."));

            barrier.open(n.div_ceil(granularity));
            let program = self.program;
            let inbox_ref = &inbox;
            let barrier_ref = &barrier;

            let results: Vec<(Outbox<P::Message>, usize)> = vertices
                .par_chunks_mut(granularity)
                .zip(halted.par_chunks_mut(granularity))
                .enumerate()
                .map_with(cpl.clone(), |cpl, (chunk, (vertices, halted))| {
                    let base = chunk * granularity;
                    let mut outbox = Outbox::new();
                    let mut running = 0;
                    for (offset, (vertex, halted)) in
                        vertices.iter_mut().zip(halted.iter_mut()).enumerate()
                    {
                        let node = base + offset;
                        let messages = inbox_ref.messages(node);
                        if *halted && messages.is_empty() {
                            continue;
                        }
                        let mut ctx = Context::new(superstep, node, &mut outbox);
                        program.compute(&mut ctx, vertex, messages);
                        *halted = ctx.is_halted();
                        if !*halted {
                            running += 1;
                        }
                    }
                    cpl.update_with_count(vertices.len());
                    barrier_ref.arrive();
                    (outbox, running)
                })
                .collect();

            cpl.done();

            let running = results.iter().map(|(_, r)| r).sum();
            let messages = results.iter().map(|(o, _)| o.len()).sum();
            inbox = Mailbox::from_outboxes(n, results.into_iter().map(|(o, _)| o));

            let stats = SuperstepStats {
                superstep,
                active,
                running,
                messages,
            };
            log::info!(
                "Superstep {}: {} active vertices, {} running, {} messages sent",
                stats.superstep,
                stats.active,
                stats.running,
                stats.messages
            );
            summary.supersteps += 1;
            summary.messages += messages as u64;
            summary.stats.push(stats);

            barrier.advance();
            pl.update_and_display();
        }

        pl.done();
        summary
    }
}
