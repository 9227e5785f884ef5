/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graph::DeveloperGraphBuilder;
use anyhow::Context;
use dsi_progress_logger::{ProgressLog, no_logging};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

/// The ways in which a single dump record can be malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Unknown record tag {0:?}")]
    UnknownTag(String),
    #[error("Missing {0} field")]
    MissingField(&'static str),
    #[error("Unexpected field {0:?} after the end of the record")]
    TrailingField(String),
    #[error("Invalid contribution count {0:?} (must be a positive integer)")]
    InvalidCount(String),
    #[error("Empty {0} identifier")]
    EmptyId(&'static str),
}

/// A malformed line of a dump.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {kind}")]
pub struct ParseError {
    /// The 1-based line number.
    pub line: usize,
    pub kind: RecordError,
}

/// Errors loading a dump.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Could not read line {line}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Splits a record into its fields, checking their number.
struct Fields<'a> {
    iter: std::str::Split<'a, char>,
}

impl<'a> Fields<'a> {
    fn new(record: &'a str) -> Self {
        Self {
            iter: record.split('|'),
        }
    }

    fn required(&mut self, name: &'static str) -> Result<&'a str, RecordError> {
        self.iter
            .next()
            .map(str::trim)
            .ok_or(RecordError::MissingField(name))
    }

    fn id(&mut self, name: &'static str) -> Result<&'a str, RecordError> {
        let id = self.required(name)?;
        if id.is_empty() {
            return Err(RecordError::EmptyId(name));
        }
        Ok(id)
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.iter.next().map(str::trim)
    }

    fn end(mut self) -> Result<(), RecordError> {
        match self.iter.next() {
            None => Ok(()),
            Some(field) => Err(RecordError::TrailingField(field.to_owned())),
        }
    }
}

/// Iterates over the non-blank identifiers of a comma-separated list.
fn id_list(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|id| !id.is_empty())
}

/// Adds the edges of a single record to a builder.
fn parse_record(builder: &mut DeveloperGraphBuilder, record: &str) -> Result<(), RecordError> {
    let mut fields = Fields::new(record);
    let tag = fields.required("tag")?;
    let uid = fields.id("developer")?;

    match tag {
        "U" => {
            let followings = fields.required("followings")?;
            let forks = fields.optional().unwrap_or("");
            fields.end()?;
            builder.developer(uid);
            for id in id_list(followings) {
                builder.following(uid, id, 1);
            }
            for id in id_list(forks) {
                builder.activity(uid, id, 1);
            }
        }
        "P" => {
            let owner = fields.id("owner")?;
            let count = fields.required("contributions")?;
            fields.end()?;
            let count = count
                .parse::<u32>()
                .ok()
                .filter(|&c| c > 0)
                .ok_or_else(|| RecordError::InvalidCount(count.to_owned()))?;
            builder.activity(uid, owner, count);
        }
        "S" | "W" => {
            let owner = fields.id("owner")?;
            fields.end()?;
            builder.activity(uid, owner, 1);
        }
        _ => return Err(RecordError::UnknownTag(tag.to_owned())),
    }
    Ok(())
}

/// Loads a graph dump.
///
/// The dump is line oriented, with `|`-separated fields:
///
/// ```text
/// U|uid|following_1,following_2,...|forked_owner_1,forked_owner_2,...
/// P|uid|owner_uid|contributions
/// S|uid|owner_uid
/// W|uid|owner_uid
/// ```
///
/// A `U` record declares a developer; each developer in the third field
/// receives a following edge of weight one, and each owner of a forked
/// repository in the optional fourth field receives an activity edge of
/// weight one. `P` records (contributions) add the given positive count to
/// the activity edge towards the owner of the repository, while `S`
/// (stargazing) and `W` (watching) records add one. Repeated edges
/// accumulate their weights.
///
/// Blank lines and lines starting with `#` are skipped. Developers that are
/// only mentioned as targets become vertices with no out-edges.
///
/// # Examples
///
/// ```
/// use devrank::prelude::*;
///
/// let dump = "U|1|2,3|\nP|1|3|12\nS|2|1\n";
/// let graph = load_dump(dump.as_bytes())?.build(InitialRank::Uniform)?;
/// assert_eq!(graph.num_developers(), 3);
/// assert_eq!(graph.num_arcs(Channel::Following), 2);
/// assert_eq!(graph.num_arcs(Channel::Activity), 2);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_dump(reader: impl BufRead) -> Result<DeveloperGraphBuilder, LoadError> {
    load_dump_with_logging(reader, no_logging![])
}

/// Loads a graph dump, logging progress on lines.
///
/// See [`load_dump`] for the format.
pub fn load_dump_with_logging(
    reader: impl BufRead,
    pl: &mut impl ProgressLog,
) -> Result<DeveloperGraphBuilder, LoadError> {
    let mut builder = DeveloperGraphBuilder::new();

    pl.item_name("line");
    pl.expected_updates(None);
    pl.start("Reading graph dump...");

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LoadError::Io {
            line: i + 1,
            source,
        })?;
        let record = line.trim();
        if !record.is_empty() && !record.starts_with('#') {
            parse_record(&mut builder, record).map_err(|kind| ParseError { line: i + 1, kind })?;
        }
        pl.light_update();
    }

    pl.done();
    log::info!("Loaded {} developers", builder.num_developers());
    Ok(builder)
}

/// Loads a graph dump from a file.
pub fn load_dump_file(path: impl AsRef<Path>) -> anyhow::Result<DeveloperGraphBuilder> {
    let path = path.as_ref();
    log::info!("Loading graph dump from {}", path.display());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Could not open {}", path.display()))?;
    load_dump(std::io::BufReader::new(file))
        .with_context(|| format!("Could not load graph dump from {}", path.display()))
}
