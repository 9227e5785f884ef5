/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Rank-propagation programs.

pub mod devrank;

pub use devrank::{DevRank, DiagnosticCounts};
