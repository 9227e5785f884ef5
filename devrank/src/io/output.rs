/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graph::DeveloperRank;
use crate::message::Channel;
use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;

/// How to write the final ranks of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankFormat {
    /// One line per developer, with identifier, following rank and activity
    /// rank separated by tabs.
    #[default]
    Tsv,
    /// A JSON array of objects with fields `id`, `following` and `activity`.
    Json,
}

impl RankFormat {
    /// Writes ranks using the format defined by `self`.
    ///
    /// If `precision` is not `None`, ranks are written with the given number
    /// of decimal digits; otherwise, the shortest representation that
    /// round-trips is used.
    pub fn write(
        &self,
        mut writer: impl Write,
        ranks: &[DeveloperRank<'_>],
        precision: Option<usize>,
    ) -> Result<()> {
        match self {
            RankFormat::Tsv => {
                for rank in ranks {
                    match precision {
                        None => writeln!(writer, "{}\t{}\t{}", rank.id, rank.following, rank.activity),
                        Some(precision) => writeln!(
                            writer,
                            "{}\t{:.precision$}\t{:.precision$}",
                            rank.id, rank.following, rank.activity
                        ),
                    }?;
                }
            }
            RankFormat::Json => match precision {
                None => serde_json::to_writer(&mut writer, ranks)?,
                Some(precision) => {
                    let rounded = ranks
                        .iter()
                        .map(|rank| DeveloperRank {
                            following: round(rank.following, precision),
                            activity: round(rank.activity, precision),
                            ..*rank
                        })
                        .collect::<Vec<_>>();
                    serde_json::to_writer(&mut writer, &rounded)?
                }
            },
        }
        writer.flush()?;
        Ok(())
    }

    /// Stores ranks in the specified `path` using the format defined by
    /// `self`, creating parent directories as needed.
    pub fn store(
        &self,
        path: impl AsRef<Path>,
        ranks: &[DeveloperRank<'_>],
        precision: Option<usize>,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent_dir) = path.parent() {
            std::fs::create_dir_all(parent_dir).with_context(|| {
                format!("Failed to create the directory {}", parent_dir.display())
            })?;
        }
        let file = std::fs::File::create(path)
            .with_context(|| format!("Could not create rank file at {}", path.display()))?;
        log::info!("Storing ranks in {:?} format at {}", self, path.display());
        self.write(BufWriter::new(file), ranks, precision)
            .with_context(|| format!("Could not write ranks to {}", path.display()))
    }
}

/// Rounds `x` to `precision` decimal digits.
fn round(x: f64, precision: usize) -> f64 {
    // An f64 has at most 17 significant decimal digits
    if precision > 17 {
        return x;
    }
    let scale = 10_f64.powi(precision as i32);
    (x * scale).round() / scale
}

/// Sorts ranks by decreasing value on the given channel.
///
/// The sort is stable, so developers with the same rank keep their relative
/// order.
pub fn sort_ranks(ranks: &mut [DeveloperRank<'_>], channel: Channel) {
    ranks.sort_by(|a, b| b.rank(channel).total_cmp(&a.rank(channel)));
}
