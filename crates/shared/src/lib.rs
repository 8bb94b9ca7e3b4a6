pub mod grouping;
pub mod stats;
pub mod types;

pub use grouping::{flatten_groups, group_by_parent, TicketGroup};
pub use stats::{calculate_vote_stats, round_to_tenth, VoteCount, VoteStats};
pub use types::*;
