/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]
#![allow(clippy::type_complexity)]

pub mod bsp;
pub mod config;
pub mod graph;
pub mod io;
pub mod message;
pub mod rank;

pub mod prelude {
    pub use crate::bsp::{Context, Engine, RunSummary, SuperstepStats, VertexProgram};
    pub use crate::config::{ConfigError, InitialRank, JobConfig};
    pub use crate::graph::{
        Anomalies, DeveloperGraph, DeveloperGraphBuilder, DeveloperRank, DeveloperVertex,
        WeightedEdges,
    };
    pub use crate::io::{
        LoadError, ParseError, RankFormat, load_dump, load_dump_file, load_dump_with_logging,
        sort_ranks,
    };
    pub use crate::message::{Channel, Message};
    pub use crate::rank::{DevRank, DiagnosticCounts};
}
