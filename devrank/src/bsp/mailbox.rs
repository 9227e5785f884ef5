/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use rayon::slice::ParallelSliceMut;

/// Messages sent by a chunk of vertices during a superstep.
///
/// Each parallel task owns its outbox, so sending a message never requires
/// synchronization.
#[derive(Debug, Clone)]
pub struct Outbox<M> {
    messages: Vec<(usize, M)>,
}

impl<M> Default for Outbox<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Outbox<M> {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, target: usize, message: M) {
        self.messages.push((target, message));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates over pairs of target and message, in sending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &M)> + '_ {
        self.messages.iter().map(|(t, m)| (*t, m))
    }
}

/// The messages to be delivered at a superstep, grouped by target.
///
/// Messages are stored contiguously; the messages of node *i* are those
/// between `offsets[i]` and `offsets[i + 1]`.
#[derive(Debug, Clone)]
pub struct Mailbox<M> {
    offsets: Box<[usize]>,
    messages: Box<[M]>,
}

impl<M: Send> Mailbox<M> {
    /// Returns a mailbox with no messages for `num_nodes` nodes.
    pub fn empty(num_nodes: usize) -> Self {
        Self {
            offsets: vec![0; num_nodes + 1].into_boxed_slice(),
            messages: Box::default(),
        }
    }

    /// Routes the content of a sequence of outboxes.
    ///
    /// For each target, messages keep the order in which they appear in the
    /// concatenation of the outboxes.
    ///
    /// # Panics
    ///
    /// Panics if a message is addressed to a node not smaller than
    /// `num_nodes`.
    pub fn from_outboxes(num_nodes: usize, outboxes: impl IntoIterator<Item = Outbox<M>>) -> Self {
        let mut pairs: Vec<(usize, M)> = Vec::new();
        for outbox in outboxes {
            pairs.extend(outbox.messages);
        }

        let mut offsets = vec![0; num_nodes + 1].into_boxed_slice();
        for &(target, _) in &pairs {
            assert!(
                target < num_nodes,
                "Message addressed to node {target}, but there are only {num_nodes} nodes"
            );
            offsets[target + 1] += 1;
        }
        for i in 0..num_nodes {
            offsets[i + 1] += offsets[i];
        }

        // Stable, so the sending order is preserved within each target
        pairs.par_sort_by_key(|&(target, _)| target);

        Self {
            offsets,
            messages: pairs.into_iter().map(|(_, m)| m).collect(),
        }
    }
}

impl<M> Mailbox<M> {
    /// Returns the messages addressed to `node`.
    pub fn messages(&self, node: usize) -> &[M] {
        &self.messages[self.offsets[node]..self.offsets[node + 1]]
    }

    pub fn has_messages(&self, node: usize) -> bool {
        self.offsets[node] != self.offsets[node + 1]
    }

    /// Returns the total number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
