//! Parent-based ticket grouping.
//!
//! Tracker exports commonly nest stories under an epic. Grouping tickets by
//! parent lets a team review related stories back-to-back: the flattened
//! group order becomes the room's canonical ticket order at upload time, and
//! the same grouping feeds the session summary view.

use crate::types::Ticket;
use serde::{Deserialize, Serialize};

/// Tickets sharing one parent. `parent_key = None` is the bucket for
/// tickets without a parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_summary: Option<String>,
    pub tickets: Vec<Ticket>,
}

/// Partition tickets into parent groups.
///
/// Parent-keyed groups come first, ordered lexicographically by parent
/// summary; the ungrouped bucket sorts last. Ticket order inside each group
/// follows the input.
pub fn group_by_parent(tickets: &[Ticket]) -> Vec<TicketGroup> {
    let mut groups: Vec<TicketGroup> = Vec::new();

    for ticket in tickets {
        match groups
            .iter_mut()
            .find(|g| g.parent_key == ticket.parent_key)
        {
            Some(group) => group.tickets.push(ticket.clone()),
            None => groups.push(TicketGroup {
                parent_key: ticket.parent_key.clone(),
                parent_summary: ticket.parent_summary.clone(),
                tickets: vec![ticket.clone()],
            }),
        }
    }

    // Stable sort: within-group order and the order of groups with equal
    // summaries both follow first appearance.
    groups.sort_by(|a, b| match (&a.parent_key, &b.parent_key) {
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
        (Some(_), Some(_)) => {
            let a_summary = a.parent_summary.as_deref().unwrap_or("");
            let b_summary = b.parent_summary.as_deref().unwrap_or("");
            a_summary.cmp(b_summary)
        }
    });

    groups
}

/// Concatenate groups back into one ticket sequence, in group order.
pub fn flatten_groups(groups: Vec<TicketGroup>) -> Vec<Ticket> {
    groups.into_iter().flat_map(|g| g.tickets).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(key: &str, parent: Option<(&str, &str)>) -> Ticket {
        Ticket {
            id: key.to_string(),
            key: key.to_string(),
            summary: format!("Summary for {key}"),
            assignee: None,
            description: None,
            parent_key: parent.map(|(k, _)| k.to_string()),
            parent_summary: parent.map(|(_, s)| s.to_string()),
            votes: Vec::new(),
            is_revealed: false,
            agreed_points: None,
        }
    }

    #[test]
    fn test_siblings_become_adjacent() {
        let tickets = vec![
            ticket("A-1", None),
            ticket("A-2", Some(("EPIC-1", "Checkout"))),
            ticket("A-3", Some(("EPIC-1", "Checkout"))),
        ];
        let flat = flatten_groups(group_by_parent(&tickets));
        let keys: Vec<&str> = flat.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["A-2", "A-3", "A-1"]);
    }

    #[test]
    fn test_parent_groups_sort_by_summary() {
        let tickets = vec![
            ticket("B-1", Some(("EPIC-2", "Zebra"))),
            ticket("A-1", Some(("EPIC-1", "Apple"))),
            ticket("B-2", Some(("EPIC-2", "Zebra"))),
        ];
        let groups = group_by_parent(&tickets);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].parent_summary.as_deref(), Some("Apple"));
        assert_eq!(groups[1].parent_summary.as_deref(), Some("Zebra"));
        assert_eq!(groups[1].tickets.len(), 2);
    }

    #[test]
    fn test_ungrouped_bucket_sorts_last() {
        let tickets = vec![
            ticket("C-1", None),
            ticket("C-2", Some(("EPIC-9", "Migrations"))),
            ticket("C-3", None),
        ];
        let groups = group_by_parent(&tickets);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].parent_key.as_deref(), Some("EPIC-9"));
        assert!(groups[1].parent_key.is_none());
        let keys: Vec<&str> = groups[1].tickets.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["C-1", "C-3"]);
    }

    #[test]
    fn test_flatten_is_order_stable_permutation() {
        let tickets = vec![
            ticket("D-1", Some(("EPIC-2", "Billing"))),
            ticket("D-2", None),
            ticket("D-3", Some(("EPIC-1", "Auth"))),
            ticket("D-4", Some(("EPIC-2", "Billing"))),
            ticket("D-5", None),
            ticket("D-6", Some(("EPIC-1", "Auth"))),
        ];
        let flat = flatten_groups(group_by_parent(&tickets));

        // Permutation: same multiset of keys.
        assert_eq!(flat.len(), tickets.len());
        let mut original: Vec<&str> = tickets.iter().map(|t| t.key.as_str()).collect();
        let mut flattened: Vec<&str> = flat.iter().map(|t| t.key.as_str()).collect();
        original.sort_unstable();
        flattened.sort_unstable();
        assert_eq!(original, flattened);

        // Relative order within each parent bucket is preserved.
        let keys: Vec<&str> = flat.iter().map(|t| t.key.as_str()).collect();
        let pos = |k: &str| keys.iter().position(|x| *x == k).unwrap();
        assert!(pos("D-3") < pos("D-6"));
        assert!(pos("D-1") < pos("D-4"));
        assert!(pos("D-2") < pos("D-5"));
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_parent(&[]).is_empty());
        assert!(flatten_groups(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_group_input_unchanged() {
        let tickets = vec![
            ticket("E-1", Some(("EPIC-1", "Search"))),
            ticket("E-2", Some(("EPIC-1", "Search"))),
        ];
        let flat = flatten_groups(group_by_parent(&tickets));
        assert_eq!(flat, tickets);
    }
}
