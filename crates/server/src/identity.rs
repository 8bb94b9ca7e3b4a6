//! Join/reconnect resolution.
//!
//! Clients carry no durable session token; a polling client that loses its
//! local state rejoins by name. Name matching is case-insensitive on the
//! trimmed name, trading a small collision risk for surviving the common
//! capitalization drift.

use shared::{Participant, Room};

#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub participant: Participant,
    pub is_reconnect: bool,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Decide whether a join is a new participant or a returning one, and
/// whether they hold the admin role.
///
/// On reconnect the stored identity wins and `candidate_id` is ignored; the
/// display name is refreshed to the newly supplied trimmed value. Whoever
/// matches the room's admin name (case-insensitively) is the admin, and
/// `admin_id` tracks their current identity.
pub fn resolve_join(room: &mut Room, candidate_id: &str, name: &str) -> JoinOutcome {
    let display_name = name.trim().to_string();
    let normalized = normalize(name);
    let matches_admin = normalized == normalize(&room.admin_name);

    if let Some(existing) = room
        .participants
        .iter_mut()
        .find(|p| normalize(&p.name) == normalized)
    {
        existing.name = display_name;
        if matches_admin {
            existing.is_admin = true;
            room.admin_id = existing.id.clone();
        }
        return JoinOutcome {
            participant: existing.clone(),
            is_reconnect: true,
        };
    }

    let participant = Participant {
        id: candidate_id.to_string(),
        name: display_name,
        is_admin: matches_admin,
    };
    if matches_admin {
        room.admin_id = participant.id.clone();
    }
    room.participants.push(participant.clone());

    JoinOutcome {
        participant,
        is_reconnect: false,
    }
}
