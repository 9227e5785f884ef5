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

use anyhow::{Context, Result, bail, ensure};
use clap::{Args, Parser, Subcommand, ValueEnum};
use devrank::io::RankFormat;
use devrank::message::Channel;
use std::io::Write;
use std::time::Duration;

pub mod run;
pub mod stats;

pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    pub fn version_string() -> String {
        format!(
            "{}
git info: {} {} {}
build info: built on {} for {} with {}",
            PKG_VERSION,
            GIT_VERSION.unwrap_or(""),
            GIT_COMMIT_HASH.unwrap_or(""),
            match GIT_DIRTY {
                None => "",
                Some(true) => "(dirty)",
                Some(false) => "(clean)",
            },
            BUILD_DATE,
            TARGET,
            RUSTC_VERSION
        )
    }
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(...,  value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = rayon::current_num_threads().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

/// Creates a [`ThreadPool`](rayon::ThreadPool) with the given number of threads.
pub fn get_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    let thread_pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("Failed to create thread pool")?;
    log::info!("Using {} threads", thread_pool.current_num_threads());
    Ok(thread_pool)
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
/// Formats for storing ranks.
pub enum RankFormatArg {
    /// Tab-separated values: identifier, following rank, activity rank.
    #[default]
    Tsv,
    /// A JSON array of objects with fields "id", "following" and "activity".
    Json,
}

impl From<RankFormatArg> for RankFormat {
    fn from(fmt: RankFormatArg) -> Self {
        match fmt {
            RankFormatArg::Tsv => RankFormat::Tsv,
            RankFormatArg::Json => RankFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
/// The rank-propagation channels.
pub enum ChannelArg {
    /// Rank flowing along "follows" relationships.
    Following,
    /// Rank flowing along contributions, forks, stars and watches.
    Activity,
}

impl From<ChannelArg> for Channel {
    fn from(channel: ChannelArg) -> Self {
        match channel {
            ChannelArg::Following => Channel::Following,
            ChannelArg::Activity => Channel::Activity,
        }
    }
}

/// Parses a duration from a string.
///
/// For compatibility with Java, if no suffix is given, it is assumed to be
/// in milliseconds. The available suffixes are `s` (seconds), `m` (minutes),
/// `h` (hours) and `d` (days); for example, `1m30s` is ninety seconds.
pub fn parse_duration(value: &str) -> Result<Duration> {
    if value.trim().is_empty() {
        bail!("Empty duration string; if you want every 0 milliseconds use `0`");
    }
    let mut duration = Duration::ZERO;
    let mut digits = String::new();
    for c in value.chars().filter(|c| !c.is_whitespace()) {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit = match c {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 60 * 60 * 24,
            _ => bail!("Invalid duration suffix: {c}"),
        };
        ensure!(!digits.is_empty(), "Missing value before suffix {c}");
        duration += Duration::from_secs(digits.parse::<u64>()? * unit);
        digits.clear();
    }
    if !digits.is_empty() {
        duration += Duration::from_millis(digits.parse::<u64>()?);
    }
    Ok(duration)
}

/// Initializes the `env_logger` logger with a custom format including
/// timestamps and the time elapsed since initialization.
///
/// The default filter is `info`; it can be changed with the `RUST_LOG`
/// environment variable.
pub fn init_env_logger() -> Result<()> {
    use jiff::SignedDuration;
    use jiff::fmt::friendly::{Designator, Spacing, SpanPrinter};

    let start = std::time::Instant::now();
    let printer = SpanPrinter::new()
        .spacing(Spacing::None)
        .designator(Designator::Compact);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let elapsed = SignedDuration::from_millis(start.elapsed().as_millis() as i64);
            let style = buf.default_level_style(record.level());
            writeln!(
                buf,
                "{} {:>8} {style}{:5}{style:#} [{:?}] {} - {}",
                jiff::Timestamp::now().strftime("%F %T%.3f"),
                printer.duration_to_string(&elapsed),
                record.level(),
                std::thread::current().id(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .context("Failed to initialize the logger")?;
    Ok(())
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global=true, display_order = 1000)]
    /// How often to log progress. Default is 10s. You can use the suffixes "s"
    /// for seconds, "m" for minutes, "h" for hours, and "d" for days. If no
    /// suffix is provided it is assumed to be in milliseconds.
    /// Example: "1m30s" is 90 seconds.
    pub log_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Run(run::CliArgs),
    Stats(stats::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "devrank", version=build_info::version_string())]
/// Computes DevRank, an influence score for developers, on graph dumps.
///
/// Noteworthy environment variables:
///
/// - RUST_MIN_STACK: minimum thread stack size (in bytes)
///
/// - RUST_LOG: configuration for env_logger
///   <https://docs.rs/env_logger/latest/env_logger/>
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = Cli::parse_from(args);
    match cli.command {
        SubCommands::Run(args) => {
            run::main(cli.args, args)?;
        }
        SubCommands::Stats(args) => {
            stats::main(cli.args, args)?;
        }
    }

    log::info!(
        "The command took {}",
        pretty_print_elapsed(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// Pretty-prints seconds in a human-readable format.
fn pretty_print_elapsed(elapsed: f64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (60 * 60 * 24 * 7, "week"),
        (60 * 60 * 24, "day"),
        (60 * 60, "hour"),
        (60, "minute"),
    ];

    let mut result = String::new();
    let mut seconds = elapsed as u64;
    for (size, name) in UNITS {
        let count = seconds / size;
        seconds %= size;
        match count {
            0 => {}
            1 => result.push_str(&format!("1 {name} ")),
            _ => result.push_str(&format!("{count} {name}s ")),
        }
    }

    result.push_str(&format!("{:.3} seconds ({}s)", elapsed % 60.0, elapsed));
    result
}
