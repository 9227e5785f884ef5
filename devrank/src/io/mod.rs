/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Input and output of DevRank jobs.
//!
//! Graphs are read from the line-oriented dump written by the DevRank
//! database client (see [`load_dump`]), and ranks are written in one of the
//! [`RankFormat`]s.

mod dump;
pub use dump::*;

mod output;
pub use output::*;
