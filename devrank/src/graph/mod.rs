/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The vertex state store.
//!
//! A [`DeveloperGraph`] contains one [`DeveloperVertex`] per developer,
//! indexed by a dense node index in 0 . . *n*. Developer identifiers are
//! opaque strings; they are interned in first-seen order by the
//! [`DeveloperGraphBuilder`] and kept for output.
//!
//! Edges are added per [channel](Channel) with a positive weight; adding the
//! same edge more than once accumulates its weight. Targets that never appear
//! as sources become developers with no out-edges.
//!
//! # Examples
//!
//! ```
//! use devrank::prelude::*;
//!
//! let mut builder = DeveloperGraphBuilder::new();
//! builder
//!     .following("alice", "bob", 1)
//!     .following("alice", "carol", 1)
//!     .activity("bob", "alice", 3);
//! let graph = builder.build(InitialRank::Uniform)?;
//!
//! assert_eq!(graph.num_developers(), 3);
//! let alice = graph.index_of("alice").unwrap();
//! assert_eq!(graph.vertex(alice).weight(Channel::Following), 2);
//! assert_eq!(graph.vertex(alice).following_rank(), 1.0 / 3.0);
//! # Ok::<(), devrank::config::ConfigError>(())
//! ```

mod vertex;
pub use vertex::*;

use crate::config::{ConfigError, InitialRank};
use crate::message::Channel;
use kahan::KahanSum;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Incrementally builds a [`DeveloperGraph`].
#[derive(Debug, Default)]
pub struct DeveloperGraphBuilder {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    followings: Vec<BTreeMap<usize, u64>>,
    activities: Vec<BTreeMap<usize, u64>>,
}

impl DeveloperGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of developers seen so far.
    pub fn num_developers(&self) -> usize {
        self.ids.len()
    }

    /// Declares a developer, returning its node index.
    ///
    /// Declaring the same developer twice is harmless.
    pub fn developer(&mut self, id: &str) -> usize {
        if let Some(&node) = self.index.get(id) {
            return node;
        }
        let node = self.ids.len();
        self.ids.push(id.to_owned());
        self.index.insert(id.to_owned(), node);
        self.followings.push(BTreeMap::new());
        self.activities.push(BTreeMap::new());
        node
    }

    /// Adds `weight` to the edge from `src` to `dst` on the given channel.
    ///
    /// # Panics
    ///
    /// Panics if `weight` is zero.
    pub fn add_edge(&mut self, channel: Channel, src: &str, dst: &str, weight: u32) -> &mut Self {
        assert!(
            weight > 0,
            "Edge weights must be positive ({src} -> {dst} on channel {channel})"
        );
        let src = self.developer(src);
        let dst = self.developer(dst);
        let edges = match channel {
            Channel::Following => &mut self.followings[src],
            Channel::Activity => &mut self.activities[src],
        };
        *edges.entry(dst).or_default() += u64::from(weight);
        self
    }

    /// Adds `weight` to the following edge from `src` to `dst`.
    pub fn following(&mut self, src: &str, dst: &str, weight: u32) -> &mut Self {
        self.add_edge(Channel::Following, src, dst, weight)
    }

    /// Adds `weight` to the activity edge from `src` to `dst`.
    pub fn activity(&mut self, src: &str, dst: &str, weight: u32) -> &mut Self {
        self.add_edge(Channel::Activity, src, dst, weight)
    }

    /// Builds the graph, assigning initial ranks following the given policy.
    pub fn build(self, initial_rank: InitialRank) -> Result<DeveloperGraph, ConfigError> {
        initial_rank.validate()?;
        let n = self.ids.len();
        let rank = initial_rank.value(n);
        let vertices = self
            .followings
            .into_iter()
            .zip(self.activities)
            .map(|(f, a)| DeveloperVertex::new(f.into(), a.into(), rank))
            .collect();

        Ok(DeveloperGraph {
            ids: self.ids.into_boxed_slice(),
            index: self.index,
            vertices,
        })
    }
}

/// The final ranks of a developer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeveloperRank<'a> {
    pub id: &'a str,
    pub following: f64,
    pub activity: f64,
}

impl DeveloperRank<'_> {
    pub fn rank(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Following => self.following,
            Channel::Activity => self.activity,
        }
    }
}

/// A developer graph: the vertex state store of a DevRank job.
#[derive(Debug, Clone)]
pub struct DeveloperGraph {
    ids: Box<[String]>,
    index: HashMap<String, usize>,
    vertices: Box<[DeveloperVertex]>,
}

impl DeveloperGraph {
    pub fn num_developers(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of distinct edges of the given channel.
    pub fn num_arcs(&self, channel: Channel) -> usize {
        self.vertices.iter().map(|v| v.edges(channel).len()).sum()
    }

    /// Returns the node index of a developer.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Returns the identifier of a node.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not smaller than the number of developers.
    pub fn id(&self, node: usize) -> &str {
        &self.ids[node]
    }

    pub fn vertex(&self, node: usize) -> &DeveloperVertex {
        &self.vertices[node]
    }

    pub fn vertices(&self) -> &[DeveloperVertex] {
        &self.vertices
    }

    /// Returns the vertices for mutation by an engine.
    pub fn vertices_mut(&mut self) -> &mut [DeveloperVertex] {
        &mut self.vertices
    }

    /// Iterates over the current ranks of all developers, in node order.
    pub fn ranks(&self) -> impl Iterator<Item = DeveloperRank<'_>> + '_ {
        self.ids
            .iter()
            .zip(self.vertices.iter())
            .map(|(id, v)| DeveloperRank {
                id: id.as_str(),
                following: v.following_rank(),
                activity: v.activity_rank(),
            })
    }

    /// Returns the total rank mass of a channel.
    pub fn total_rank(&self, channel: Channel) -> f64 {
        self.vertices
            .iter()
            .fold(KahanSum::<f64>::new(), |sum, v| sum + v.rank(channel))
            .sum()
    }

    /// Returns the number of developers with zero total weight on a channel.
    pub fn num_dangling(&self, channel: Channel) -> usize {
        self.vertices
            .iter()
            .filter(|v| v.weight(channel) == 0)
            .count()
    }

    /// Clears the anomalies recorded by all developers.
    pub fn clear_anomalies(&mut self) {
        self.vertices.iter_mut().for_each(DeveloperVertex::clear_anomalies);
    }

    /// Returns the number of developers with at least one anomaly.
    pub fn num_anomalous(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| !v.anomalies().is_empty())
            .count()
    }
}
