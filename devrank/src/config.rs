/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Job configuration.
//!
//! A DevRank job is parameterized by the maximum superstep bound *k*, the
//! damping factor α, the [initial rank policy](InitialRank) and the
//! granularity of parallel tasks. All parameters are fixed for the whole job
//! and are validated before any superstep is executed.
//!
//! Parameters can be read from a Java-style `.properties` file:
//!
//! ```text
//! superstep = 10
//! damping = 0.85
//! initial.rank = uniform
//! granularity = 1000
//! ```
//!
//! Absent keys take their default value; present but invalid keys are
//! errors.

use std::collections::HashMap;
use std::fmt::Display;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors in the configuration of a job.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The superstep bound is negative.
    #[error("The superstep bound must be non-negative, got {0}")]
    NegativeSuperstep(i64),

    /// A value could not be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    /// The damping factor is outside [0 . . 1).
    #[error("The damping factor must be in [0 . . 1), got {0}")]
    Damping(f64),

    /// The initial rank is not a finite value in (0 . . 1].
    #[error("The initial rank must be in (0 . . 1], got {0}")]
    InitialRank(f64),

    /// The granularity is zero.
    #[error("The granularity must be positive")]
    Granularity,

    /// The properties file could not be read.
    #[error("Could not read properties: {0}")]
    Properties(String),
}

/// The policy assigning initial rank values to vertices.
///
/// The rank-propagation recurrence does not define a starting point, so the
/// graph construction needs this explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InitialRank {
    /// Both ranks start at 1/*n*, where *n* is the number of developers.
    #[default]
    Uniform,
    /// Both ranks start at the given value.
    Constant(f64),
}

impl InitialRank {
    /// Checks that a constant initial rank is a finite value in (0 . . 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            InitialRank::Uniform => Ok(()),
            InitialRank::Constant(x) => {
                if x.is_finite() && x > 0.0 && x <= 1.0 {
                    Ok(())
                } else {
                    Err(ConfigError::InitialRank(x))
                }
            }
        }
    }

    /// Returns the initial rank of each vertex of a graph with `n` vertices.
    pub fn value(&self, n: usize) -> f64 {
        match *self {
            InitialRank::Uniform => 1.0 / n.max(1) as f64,
            InitialRank::Constant(x) => x,
        }
    }
}

impl FromStr for InitialRank {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("uniform") {
            return Ok(InitialRank::Uniform);
        }
        let x = s.parse::<f64>().map_err(|_| ConfigError::InvalidValue {
            key: JobConfig::INITIAL_RANK_KEY,
            value: s.to_owned(),
        })?;
        let initial_rank = InitialRank::Constant(x);
        initial_rank.validate()?;
        Ok(initial_rank)
    }
}

impl Display for InitialRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitialRank::Uniform => f.write_str("uniform"),
            InitialRank::Constant(x) => write!(f, "{x}"),
        }
    }
}

/// Parses a superstep bound, rejecting negative values.
///
/// This function is also meant to be used as a `clap` value parser.
pub fn parse_max_supersteps(arg: &str) -> Result<u64, ConfigError> {
    let arg = arg.trim();
    let k = arg.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
        key: JobConfig::SUPERSTEP_KEY,
        value: arg.to_owned(),
    })?;
    u64::try_from(k).map_err(|_| ConfigError::NegativeSuperstep(k))
}

/// The parameters of a DevRank job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobConfig {
    /// The superstep bound *k*: vertices emit messages at supersteps
    /// 0 . . *k* and vote to halt from superstep *k* on.
    pub max_supersteps: u64,
    /// The damping factor α.
    pub alpha: f64,
    /// How initial ranks are assigned.
    pub initial_rank: InitialRank,
    /// The number of vertices passed to a parallel task at a time.
    pub granularity: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            max_supersteps: Self::DEFAULT_MAX_SUPERSTEPS,
            alpha: Self::DEFAULT_ALPHA,
            initial_rank: InitialRank::default(),
            granularity: Self::DEFAULT_GRANULARITY,
        }
    }
}

impl JobConfig {
    pub const DEFAULT_MAX_SUPERSTEPS: u64 = 10;
    pub const DEFAULT_ALPHA: f64 = 0.85;
    pub const DEFAULT_GRANULARITY: usize = 1000;

    pub const SUPERSTEP_KEY: &'static str = "superstep";
    pub const DAMPING_KEY: &'static str = "damping";
    pub const INITIAL_RANK_KEY: &'static str = "initial.rank";
    pub const GRANULARITY_KEY: &'static str = "granularity";

    /// Checks all parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Note that 0.0..1.0 is [0.0..1.0) in mathematical notation
        if !(0.0..1.0).contains(&self.alpha) {
            return Err(ConfigError::Damping(self.alpha));
        }
        if self.granularity == 0 {
            return Err(ConfigError::Granularity);
        }
        self.initial_rank.validate()
    }

    /// Reads a configuration from a Java-style properties stream.
    ///
    /// Unknown keys are ignored.
    pub fn from_properties(reader: impl Read) -> Result<Self, ConfigError> {
        let props = java_properties::read(reader)
            .map_err(|e| ConfigError::Properties(e.to_string()))?;
        Self::from_map(&props)
    }

    /// Reads a configuration from a Java-style properties file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| ConfigError::Properties(format!("{}: {e}", path.display())))?;
        Self::from_properties(std::io::BufReader::new(file))
    }

    fn from_map(props: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(k) = props.get(Self::SUPERSTEP_KEY) {
            config.max_supersteps = parse_max_supersteps(k)?;
        }
        if let Some(alpha) = props.get(Self::DAMPING_KEY) {
            config.alpha = alpha
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: Self::DAMPING_KEY,
                    value: alpha.clone(),
                })?;
        }
        if let Some(initial_rank) = props.get(Self::INITIAL_RANK_KEY) {
            config.initial_rank = initial_rank.parse()?;
        }
        if let Some(granularity) = props.get(Self::GRANULARITY_KEY) {
            config.granularity =
                granularity
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: Self::GRANULARITY_KEY,
                        value: granularity.clone(),
                    })?;
        }
        config.validate()?;
        Ok(config)
    }
}
