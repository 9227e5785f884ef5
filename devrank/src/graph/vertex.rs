/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::message::Channel;
use bitflags::bitflags;
use std::collections::BTreeMap;

/// A set of weighted out-edges on one channel.
///
/// Targets are node indices, sorted and distinct; the weight of a target is
/// the multiplicity of the corresponding edge in the input, accumulated in a
/// `u64` so that repeated `u32` weights cannot overflow. The sum of all
/// weights is cached, as it is the degree normalizer of the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightedEdges {
    arcs: Box<[(usize, u64)]>,
    weight: u64,
}

impl WeightedEdges {
    /// Returns the sum of the weights of all edges (not the number of
    /// edges).
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Returns the number of distinct targets.
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Returns the weight of the edge towards `target`, if any.
    pub fn get(&self, target: usize) -> Option<u64> {
        self.arcs
            .binary_search_by_key(&target, |&(t, _)| t)
            .ok()
            .map(|i| self.arcs[i].1)
    }

    /// Iterates over the distinct targets.
    pub fn targets(&self) -> impl Iterator<Item = usize> + '_ {
        self.arcs.iter().map(|&(t, _)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.arcs.iter().copied()
    }
}

impl FromIterator<(usize, u32)> for WeightedEdges {
    /// Collects edges, summing the weights of repeated targets.
    ///
    /// # Panics
    ///
    /// Panics if a weight is zero.
    fn from_iter<T: IntoIterator<Item = (usize, u32)>>(iter: T) -> Self {
        let mut map = BTreeMap::<usize, u64>::new();
        for (target, weight) in iter {
            assert!(weight > 0, "Edge weights must be positive (target {target})");
            *map.entry(target).or_default() += u64::from(weight);
        }
        Self::from(map)
    }
}

impl From<BTreeMap<usize, u64>> for WeightedEdges {
    fn from(map: BTreeMap<usize, u64>) -> Self {
        let weight = map.values().sum();
        Self {
            arcs: map.into_iter().collect(),
            weight,
        }
    }
}

bitflags! {
    /// Degenerate conditions observed while updating a vertex.
    ///
    /// Flags are sticky within a run: once set they stay set until the
    /// next run of the program clears them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Anomalies: u8 {
        /// The following channel has zero total weight, so its
        /// teleportation term was taken to be zero.
        const ZERO_FOLLOWING_WEIGHT = 1;
        /// The activity channel has zero total weight, so its
        /// teleportation term was taken to be zero.
        const ZERO_ACTIVITY_WEIGHT = 1 << 1;
        /// An update of the following rank was not finite and was clamped
        /// to zero.
        const NON_FINITE_FOLLOWING = 1 << 2;
        /// An update of the activity rank was not finite and was clamped
        /// to zero.
        const NON_FINITE_ACTIVITY = 1 << 3;
    }
}

impl Anomalies {
    pub fn zero_weight(channel: Channel) -> Self {
        match channel {
            Channel::Following => Anomalies::ZERO_FOLLOWING_WEIGHT,
            Channel::Activity => Anomalies::ZERO_ACTIVITY_WEIGHT,
        }
    }

    pub fn non_finite(channel: Channel) -> Self {
        match channel {
            Channel::Following => Anomalies::NON_FINITE_FOLLOWING,
            Channel::Activity => Anomalies::NON_FINITE_ACTIVITY,
        }
    }
}

/// The state of a developer vertex.
///
/// A vertex owns its two edge sets and its two rank values. During a job,
/// the engine hands out exclusive references to vertices one at a time per
/// compute step, so no vertex can observe or modify the state of another
/// one.
#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperVertex {
    followings: WeightedEdges,
    activities: WeightedEdges,
    following_rank: f64,
    activity_rank: f64,
    anomalies: Anomalies,
}

impl DeveloperVertex {
    /// Creates a vertex with both ranks set to `initial_rank`.
    pub fn new(followings: WeightedEdges, activities: WeightedEdges, initial_rank: f64) -> Self {
        Self {
            followings,
            activities,
            following_rank: initial_rank,
            activity_rank: initial_rank,
            anomalies: Anomalies::empty(),
        }
    }

    pub fn followings(&self) -> &WeightedEdges {
        &self.followings
    }

    pub fn activities(&self) -> &WeightedEdges {
        &self.activities
    }

    /// Returns the out-edges of the given channel.
    pub fn edges(&self, channel: Channel) -> &WeightedEdges {
        match channel {
            Channel::Following => &self.followings,
            Channel::Activity => &self.activities,
        }
    }

    /// Returns the sum of the edge weights of the given channel.
    pub fn weight(&self, channel: Channel) -> u64 {
        self.edges(channel).weight()
    }

    pub fn following_rank(&self) -> f64 {
        self.following_rank
    }

    pub fn activity_rank(&self) -> f64 {
        self.activity_rank
    }

    pub fn rank(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Following => self.following_rank,
            Channel::Activity => self.activity_rank,
        }
    }

    pub fn set_rank(&mut self, channel: Channel, rank: f64) {
        match channel {
            Channel::Following => self.following_rank = rank,
            Channel::Activity => self.activity_rank = rank,
        }
    }

    pub fn anomalies(&self) -> Anomalies {
        self.anomalies
    }

    /// Records anomalies, returning true if any of them was not already
    /// recorded.
    pub fn record_anomalies(&mut self, anomalies: Anomalies) -> bool {
        let new = !self.anomalies.contains(anomalies);
        self.anomalies |= anomalies;
        new
    }

    /// Clears all recorded anomalies.
    pub fn clear_anomalies(&mut self) {
        self.anomalies = Anomalies::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_edges_accumulate() {
        let edges: WeightedEdges = [(3, 1), (1, 2), (3, 4)].into_iter().collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges.weight(), 7);
        assert_eq!(edges.get(3), Some(5));
        assert_eq!(edges.get(1), Some(2));
        assert_eq!(edges.get(2), None);
        assert_eq!(edges.targets().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_weighted_edges_no_overflow() {
        let edges: WeightedEdges = [(0, u32::MAX), (0, u32::MAX), (1, 2)].into_iter().collect();
        assert_eq!(edges.get(0), Some(2 * u32::MAX as u64));
        assert_eq!(edges.weight(), 2 * u32::MAX as u64 + 2);
    }

    #[test]
    #[should_panic]
    fn test_zero_weight_edge() {
        let _: WeightedEdges = [(0, 0)].into_iter().collect();
    }

    #[test]
    fn test_anomalies_sticky() {
        let mut v = DeveloperVertex::new(WeightedEdges::default(), WeightedEdges::default(), 0.5);
        assert!(v.record_anomalies(Anomalies::zero_weight(Channel::Activity)));
        assert!(!v.record_anomalies(Anomalies::ZERO_ACTIVITY_WEIGHT));
        assert!(v.record_anomalies(Anomalies::non_finite(Channel::Following)));
        assert_eq!(
            v.anomalies(),
            Anomalies::ZERO_ACTIVITY_WEIGHT | Anomalies::NON_FINITE_FOLLOWING
        );
        v.clear_anomalies();
        assert!(v.anomalies().is_empty());
        assert!(v.record_anomalies(Anomalies::ZERO_ACTIVITY_WEIGHT));
    }

    #[test]
    fn test_ranks_per_channel() {
        let mut v = DeveloperVertex::new(WeightedEdges::default(), WeightedEdges::default(), 0.5);
        v.set_rank(Channel::Activity, 0.25);
        assert_eq!(v.rank(Channel::Following), 0.5);
        assert_eq!(v.activity_rank(), 0.25);
    }
}
