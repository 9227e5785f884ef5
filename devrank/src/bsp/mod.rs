/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A bulk-synchronous-parallel, vertex-centric execution engine.
//!
//! A computation is a sequence of _supersteps_. In each superstep the
//! [`Engine`] invokes [`VertexProgram::compute`] once on every active vertex,
//! passing the messages sent to the vertex during the previous superstep.
//! A compute step can modify the state of its own vertex, send messages to
//! other vertices through its [`Context`], and vote to halt.
//!
//! Supersteps are separated by a single global barrier
//! ([`SuperstepBarrier`]): no vertex starts superstep *t* + 1 before all
//! vertices completed superstep *t* and all messages of superstep *t* have
//! been routed to their targets. Within a superstep, vertices are computed
//! in parallel in chunks, and each chunk writes its messages to a private
//! [`Outbox`], so there is no shared mutable state besides the barrier.
//!
//! A vertex that voted to halt is not computed anymore, unless it receives a
//! message, in which case it is reactivated. The computation ends when all
//! vertices have voted to halt and no messages are in flight.
//!
//! # Examples
//!
//! A program propagating the maximum value along a directed cycle:
//!
//! ```
//! use devrank::bsp::{Context, Engine, VertexProgram};
//!
//! struct MaxValue;
//!
//! impl VertexProgram for MaxValue {
//!     type Vertex = (usize, u32);
//!     type Message = u32;
//!
//!     fn compute(&self, ctx: &mut Context<'_, u32>, vertex: &mut (usize, u32), messages: &[u32]) {
//!         let max = messages.iter().copied().max().unwrap_or(0);
//!         if ctx.superstep() == 0 || max > vertex.1 {
//!             vertex.1 = vertex.1.max(max);
//!             ctx.send_message(vertex.0, vertex.1);
//!         }
//!         ctx.vote_to_halt();
//!     }
//! }
//!
//! // Each vertex stores its successor and its value
//! let mut vertices = vec![(1, 3), (2, 7), (3, 1), (0, 2)];
//! let summary = Engine::new(&MaxValue).run(&mut vertices);
//!
//! assert!(vertices.iter().all(|&(_, v)| v == 7));
//! assert_eq!(summary.supersteps, 5);
//! ```

mod barrier;
mod engine;
mod mailbox;

pub use barrier::SuperstepBarrier;
pub use engine::{Engine, RunSummary, SuperstepStats};
pub use mailbox::{Mailbox, Outbox};

/// A per-vertex computation.
///
/// Implementations must be [`Sync`], as the same program is shared by all
/// threads computing a superstep; per-vertex state belongs in
/// [`Self::Vertex`].
pub trait VertexProgram: Sync {
    /// The state of a vertex.
    type Vertex: Send;
    /// The type of messages exchanged by vertices.
    type Message: Send + Sync;

    /// Computes a vertex during a superstep.
    ///
    /// `messages` contains all messages sent to this vertex during the
    /// previous superstep, in no specified order; it is empty at superstep
    /// 0.
    fn compute(
        &self,
        ctx: &mut Context<'_, Self::Message>,
        vertex: &mut Self::Vertex,
        messages: &[Self::Message],
    );
}

/// The view of the engine available to a vertex during its compute step.
#[derive(Debug)]
pub struct Context<'a, M> {
    superstep: u64,
    node: usize,
    outbox: &'a mut Outbox<M>,
    halted: bool,
}

impl<'a, M> Context<'a, M> {
    /// Creates a context for computing `node` at the given superstep,
    /// sending messages to `outbox`.
    ///
    /// Engines create contexts; this is public to make it possible to test
    /// programs in isolation.
    pub fn new(superstep: u64, node: usize, outbox: &'a mut Outbox<M>) -> Self {
        Self {
            superstep,
            node,
            outbox,
            halted: false,
        }
    }

    /// Returns the current superstep, starting from 0.
    pub fn superstep(&self) -> u64 {
        self.superstep
    }

    /// Returns the node index of the vertex being computed.
    pub fn vertex(&self) -> usize {
        self.node
    }

    /// Sends a message that will be delivered to `target` at the next
    /// superstep.
    pub fn send_message(&mut self, target: usize, message: M) {
        self.outbox.push(target, message);
    }

    /// Votes to halt: the vertex will not be computed anymore unless it
    /// receives a message.
    pub fn vote_to_halt(&mut self) {
        self.halted = true;
    }

    /// Returns whether the vertex voted to halt during this compute step.
    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
