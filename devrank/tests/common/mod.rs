/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![allow(dead_code)]

use anyhow::Result;
use devrank::prelude::*;

/// Canonical test graph (6 developers).
///
/// Following edges (weights in parentheses):
/// - a → b (1), a → c (2)
/// - b → c (1), b → e (1)
/// - c → a (1)
/// - d → a (1), d → c (3)
/// - e and f have no followings
///
/// Activity edges:
/// - a → d (5)
/// - b → a (1), b → d (1)
/// - e → a (2)
/// - c, d and f have no activities
pub fn test_graph(initial_rank: InitialRank) -> Result<DeveloperGraph> {
    let mut builder = DeveloperGraphBuilder::new();
    builder
        .following("a", "b", 1)
        .following("a", "c", 2)
        .following("b", "c", 1)
        .following("b", "e", 1)
        .following("c", "a", 1)
        .following("d", "a", 1)
        .following("d", "c", 3)
        .activity("a", "d", 5)
        .activity("b", "a", 1)
        .activity("b", "d", 1)
        .activity("e", "a", 2);
    builder.developer("f");
    Ok(builder.build(initial_rank)?)
}

/// A pseudorandom graph with `n` developers, deterministic in `seed`.
pub fn scrambled_graph(n: usize, seed: u64) -> Result<DeveloperGraph> {
    let mut builder = DeveloperGraphBuilder::new();
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    let mut next = |bound: usize| {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % bound as u64) as usize
    };
    for i in 0..n {
        builder.developer(&i.to_string());
    }
    for i in 0..n {
        let src = i.to_string();
        for _ in 0..next(6) {
            builder.following(&src, &next(n).to_string(), 1 + next(3) as u32);
        }
        for _ in 0..next(4) {
            builder.activity(&src, &next(n).to_string(), 1 + next(10) as u32);
        }
    }
    Ok(builder.build(InitialRank::Uniform)?)
}

/// A directed cycle with unit weights on both channels.
pub fn cycle(n: usize, initial_rank: InitialRank) -> Result<DeveloperGraph> {
    let mut builder = DeveloperGraphBuilder::new();
    for i in 0..n {
        let (src, dst) = (i.to_string(), ((i + 1) % n).to_string());
        builder.following(&src, &dst, 1).activity(&src, &dst, 1);
    }
    Ok(builder.build(initial_rank)?)
}

/// Computes DevRank sequentially by straightforward iteration, returning the
/// ranks of each channel in node order.
pub fn reference_devrank(graph: &DeveloperGraph, config: &JobConfig) -> [Vec<f64>; 2] {
    let n = graph.num_developers();
    let alpha = config.alpha;
    let mut result = [Vec::new(), Vec::new()];

    for (c, channel) in Channel::ALL.into_iter().enumerate() {
        let mut rank = graph
            .vertices()
            .iter()
            .map(|v| v.rank(channel))
            .collect::<Vec<_>>();
        for _ in 0..config.max_supersteps {
            let mut sum = vec![0.0; n];
            for (src, v) in graph.vertices().iter().enumerate() {
                let w = v.weight(channel);
                if w == 0 {
                    continue;
                }
                for dst in v.edges(channel).targets() {
                    sum[dst] += rank[src] / w as f64;
                }
            }
            rank = (0..n)
                .map(|i| {
                    let w = graph.vertex(i).weight(channel);
                    let teleport = if w == 0 { 0.0 } else { (1.0 - alpha) / w as f64 };
                    teleport + alpha * sum[i]
                })
                .collect();
        }
        result[c] = rank;
    }
    result
}

/// Returns the ℓ∞ distance between two vectors.
pub fn l_inf_distance(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
