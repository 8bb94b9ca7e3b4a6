//! Vote statistics for a revealed round.

use crate::types::Vote;
use serde::{Deserialize, Serialize};

/// Count of votes for one distinct value. Entries keep the order the value
/// was first seen in, which also decides mode ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCount {
    pub value: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStats {
    pub average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_common: Option<u32>,
    pub distribution: Vec<VoteCount>,
}

/// Round to one decimal place, the precision shown everywhere votes are
/// averaged.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute average, distribution, and mode for a set of votes.
///
/// The mode tie-break is the value that was voted first among the tied
/// values. That order is visible in summaries, so it is a deliberate policy
/// rather than an implementation accident.
pub fn calculate_vote_stats(votes: &[Vote]) -> VoteStats {
    if votes.is_empty() {
        return VoteStats {
            average: 0.0,
            most_common: None,
            distribution: Vec::new(),
        };
    }

    let sum: u32 = votes.iter().map(|v| v.value).sum();
    let average = round_to_tenth(f64::from(sum) / votes.len() as f64);

    let mut distribution: Vec<VoteCount> = Vec::new();
    for vote in votes {
        match distribution.iter_mut().find(|c| c.value == vote.value) {
            Some(entry) => entry.count += 1,
            None => distribution.push(VoteCount {
                value: vote.value,
                count: 1,
            }),
        }
    }

    // Strictly-greater comparison keeps the first-seen value on ties.
    let mut most_common = None;
    let mut max_count = 0;
    for entry in &distribution {
        if entry.count > max_count {
            max_count = entry.count;
            most_common = Some(entry.value);
        }
    }

    VoteStats {
        average,
        most_common,
        distribution,
    }
}
