/*
 * SPDX-FileCopyrightText: 2026 DevRank contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The message protocol between developer vertices.
//!
//! Rank mass travels along two independent tracks, the _following_ graph
//! and the _activity_ graph. A [`Message`] carries the share of rank that the
//! sender attributes to each of its neighbors on one [`Channel`]; there is no
//! other way for a vertex to influence another one.

use kahan::KahanSum;
use std::fmt::Display;

/// One of the two independent rank-propagation tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Rank flowing along "follows" relationships.
    Following,
    /// Rank flowing along contributions, forks, stars and watches.
    Activity,
}

impl Channel {
    /// Both channels, in a fixed order.
    pub const ALL: [Channel; 2] = [Channel::Following, Channel::Activity];
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Following => f.write_str("following"),
            Channel::Activity => f.write_str("activity"),
        }
    }
}

/// A rank contribution sent to a neighbor on a given channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Message {
    channel: Channel,
    value: f64,
}

impl Message {
    pub fn new(channel: Channel, value: f64) -> Self {
        Self { channel, value }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The normalized rank share carried by this message.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Sums the contributions of a batch of messages, separately per channel,
/// using Kahan summation.
///
/// The result is indexed as [`Channel::ALL`], that is, following first.
pub fn contributions(messages: &[Message]) -> [f64; 2] {
    Channel::ALL.map(|channel| {
        messages
            .iter()
            .filter(|m| m.channel == channel)
            .fold(KahanSum::<f64>::new(), |sum, m| sum + m.value)
            .sum()
    })
}
