/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// The global barrier separating supersteps.
///
/// The barrier is a generation counter, which is the current superstep, plus
/// an account of the parallel tasks of the current generation. The
/// coordinator [opens](Self::open) a generation with the number of tasks it
/// is going to spawn, and each task [arrives](Self::arrive) when it has
/// computed all its vertices.
///
/// Arriving never blocks: the coordinator waits for its tasks by joining
/// them (in the engine, collecting the results of a Rayon parallel
/// iterator), routes their messages, and only then
/// [advances](Self::advance) to the next generation. Advancing checks that
/// every task arrived, so a superstep cannot end while some of its vertices
/// are still being computed.
///
/// Tasks only read the generation, so no vertex can observe a superstep
/// other than the one it is computing.
#[derive(Debug, Default)]
pub struct SuperstepBarrier {
    generation: AtomicU64,
    parties: AtomicUsize,
    arrived: AtomicUsize,
}

impl SuperstepBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current generation, that is, the current superstep.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Prepares the rendezvous of the current generation for `parties` tasks.
    pub fn open(&self, parties: usize) {
        self.arrived.store(0, Ordering::Relaxed);
        self.parties.store(parties, Ordering::Release);
    }

    /// Signals that a task of the current generation completed, returning
    /// the number of tasks that arrived so far.
    pub fn arrive(&self) -> usize {
        let arrived = self.arrived.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(
            arrived <= self.parties.load(Ordering::Acquire),
            "More tasks than expected arrived at superstep {}",
            self.generation()
        );
        arrived
    }

    /// Returns whether all tasks of the current generation arrived.
    pub fn is_complete(&self) -> bool {
        self.arrived.load(Ordering::Acquire) == self.parties.load(Ordering::Acquire)
    }

    /// Moves to the next generation, returning it.
    ///
    /// # Panics
    ///
    /// Panics if some task of the current generation did not arrive.
    pub fn advance(&self) -> u64 {
        assert!(
            self.is_complete(),
            "Advancing superstep {} with {} of {} tasks completed",
            self.generation(),
            self.arrived.load(Ordering::Acquire),
            self.parties.load(Ordering::Acquire)
        );
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }
}
