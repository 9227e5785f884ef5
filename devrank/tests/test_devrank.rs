/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

mod common;

use anyhow::Result;
use common::{l_inf_distance, reference_devrank};
use devrank::prelude::*;
use dsi_progress_logger::{concurrent_progress_logger, progress_logger};

fn channel_ranks(graph: &DeveloperGraph, channel: Channel) -> Vec<f64> {
    graph.ranks().map(|r| r.rank(channel)).collect()
}

#[test]
fn test_unit_cycle_converges_to_one() -> Result<()> {
    for n in [1, 2, 10, 101] {
        for initial_rank in [InitialRank::Uniform, InitialRank::Constant(1.0)] {
            let mut graph = common::cycle(n, initial_rank)?;
            let devrank = DevRank::new(JobConfig {
                max_supersteps: 200,
                ..JobConfig::default()
            });
            let summary = devrank.run(&mut graph);
            assert_eq!(summary.supersteps, 201);
            for rank in graph.ranks() {
                assert!((rank.following - 1.0).abs() < 1E-12, "n={n}: {rank:?}");
                assert!((rank.activity - 1.0).abs() < 1E-12, "n={n}: {rank:?}");
            }
            assert_eq!(devrank.diagnostics(), DiagnosticCounts::default());
        }
    }
    Ok(())
}

#[test]
fn test_matches_reference() -> Result<()> {
    for max_supersteps in [0, 1, 2, 10, 30] {
        for alpha in [0.0, 0.5, 0.85] {
            let config = JobConfig {
                max_supersteps,
                alpha,
                ..JobConfig::default()
            };
            let mut graph = common::test_graph(InitialRank::Uniform)?;
            let [following, activity] = reference_devrank(&graph, &config);

            DevRank::new(config).run(&mut graph);
            assert!(l_inf_distance(&following, &channel_ranks(&graph, Channel::Following)) < 1E-12);
            assert!(l_inf_distance(&activity, &channel_ranks(&graph, Channel::Activity)) < 1E-12);
        }
    }

    let config = JobConfig::default();
    let mut graph = common::scrambled_graph(500, 42)?;
    let [following, activity] = reference_devrank(&graph, &config);
    DevRank::new(config).run(&mut graph);
    assert!(l_inf_distance(&following, &channel_ranks(&graph, Channel::Following)) < 1E-12);
    assert!(l_inf_distance(&activity, &channel_ranks(&graph, Channel::Activity)) < 1E-12);
    Ok(())
}

#[test]
fn test_zero_supersteps() -> Result<()> {
    let mut graph = common::test_graph(InitialRank::Constant(0.5))?;
    let devrank = DevRank::new(JobConfig {
        max_supersteps: 0,
        ..JobConfig::default()
    });
    let summary = devrank.run(&mut graph);
    // A single superstep, in which everybody halts without sending
    assert_eq!(summary.supersteps, 1);
    assert_eq!(summary.messages, 0);
    assert!(graph.ranks().all(|r| r.following == 0.5 && r.activity == 0.5));
    assert_eq!(devrank.diagnostics(), DiagnosticCounts::default());
    Ok(())
}

#[test]
fn test_ranks_finite_and_non_negative() -> Result<()> {
    let mut graph = common::scrambled_graph(2000, 7)?;
    let devrank = DevRank::new(JobConfig::default());
    devrank.run(&mut graph);
    for rank in graph.ranks() {
        for channel in Channel::ALL {
            assert!(rank.rank(channel).is_finite());
            assert!(rank.rank(channel) >= 0.0);
        }
    }
    assert_eq!(devrank.diagnostics().non_finite, 0);
    Ok(())
}

#[test]
fn test_zero_weight_channels() -> Result<()> {
    common::init_logger();
    let mut graph = common::test_graph(InitialRank::Uniform)?;
    let devrank = DevRank::new(JobConfig::default());
    let mut pl = progress_logger![];
    let mut cpl = concurrent_progress_logger![];
    let summary = devrank.run_with_logging(&mut graph, &mut pl, &mut cpl);
    assert_eq!(summary.supersteps, 11);

    // e and f have no followings, c, d and f no activities
    assert_eq!(
        devrank.diagnostics(),
        DiagnosticCounts {
            zero_weight: 5,
            non_finite: 0
        }
    );
    let anomalous = |id: &str| graph.vertex(graph.index_of(id).unwrap()).anomalies();
    assert_eq!(anomalous("a"), Anomalies::empty());
    assert_eq!(anomalous("c"), Anomalies::ZERO_ACTIVITY_WEIGHT);
    assert_eq!(anomalous("e"), Anomalies::ZERO_FOLLOWING_WEIGHT);
    assert_eq!(
        anomalous("f"),
        Anomalies::ZERO_FOLLOWING_WEIGHT | Anomalies::ZERO_ACTIVITY_WEIGHT
    );
    assert_eq!(graph.num_anomalous(), 4);

    // Nobody follows or acts towards f, so it only loses rank
    let f = graph.vertex(graph.index_of("f").unwrap());
    assert_eq!(f.following_rank(), 0.0);
    assert_eq!(f.activity_rank(), 0.0);

    // Running again on the same graph reports the same anomalies
    let first = devrank.diagnostics();
    devrank.run(&mut graph);
    assert_eq!(devrank.diagnostics(), first);
    assert_eq!(graph.num_anomalous(), 4);

    // Diagnostics are reset at each run
    let mut graph = common::cycle(3, InitialRank::Uniform)?;
    devrank.run(&mut graph);
    assert_eq!(devrank.diagnostics(), DiagnosticCounts::default());
    Ok(())
}

#[test]
fn test_weight_count_asymmetry() -> Result<()> {
    // a splits its rank equally between b and c, whatever the weights, but
    // the normalizer is the total weight
    let mut builder = DeveloperGraphBuilder::new();
    builder.following("a", "b", 2).following("a", "c", 5);
    let mut graph = builder.build(InitialRank::Constant(0.4))?;
    DevRank::new(JobConfig {
        max_supersteps: 1,
        ..JobConfig::default()
    })
    .run(&mut graph);

    let b = graph.vertex(graph.index_of("b").unwrap());
    let c = graph.vertex(graph.index_of("c").unwrap());
    assert_eq!(b.following_rank(), 0.85 * (0.4 / 7.0));
    assert_eq!(c.following_rank(), b.following_rank());
    Ok(())
}

#[cfg_attr(feature = "slow_tests", test)]
#[cfg_attr(not(feature = "slow_tests"), allow(dead_code))]
fn test_large_graph() -> Result<()> {
    common::init_logger();
    let config = JobConfig {
        max_supersteps: 30,
        ..JobConfig::default()
    };
    let graph = common::scrambled_graph(200_000, 1)?;
    let [following, activity] = reference_devrank(&graph, &config);
    for num_threads in [1, 4] {
        let mut graph = common::scrambled_graph(200_000, 1)?;
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;
        let mut pl = progress_logger![];
        let mut cpl = concurrent_progress_logger![];
        thread_pool.install(|| DevRank::new(config).run_with_logging(&mut graph, &mut pl, &mut cpl));
        assert!(l_inf_distance(&following, &channel_ranks(&graph, Channel::Following)) < 1E-12);
        assert!(l_inf_distance(&activity, &channel_ranks(&graph, Channel::Activity)) < 1E-12);
    }
    Ok(())
}
