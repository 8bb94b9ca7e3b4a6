//! Room lifecycle, ticket progression, and voting rounds.
//!
//! Every operation is load → mutate in memory → whole-room write-back. The
//! store offers no compare-and-swap, so two requests racing on the same room
//! resolve as last-write-wins: the later write-back silently replaces the
//! earlier one. This is an accepted limitation, not a bug to lock away —
//! room updates are human-paced and clients converge through polling. A
//! failed precondition returns before any write-back, so the stored room is
//! never partially mutated.

use chrono::Utc;
use rand::Rng;
use shared::{
    flatten_groups, group_by_parent, Participant, Room, RoomStatus, SessionSummary, Ticket,
    TicketUpload,
};

use crate::error::AppError;
use crate::identity::{resolve_join, JoinOutcome};
use crate::store::Store;

/// 32 symbols; 0/O and 1/I are excluded as visually ambiguous.
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ROOM_CODE_LEN: usize = 6;
const MAX_CODE_ATTEMPTS: usize = 32;

#[derive(Clone)]
pub struct RoomService {
    store: Store,
}

impl RoomService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn generate_code() -> String {
        let mut rng = rand::thread_rng();
        (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect()
    }

    async fn load(&self, code: &str) -> Result<Room, AppError> {
        self.store
            .get_room(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", code.to_uppercase())))
    }

    pub async fn get_room(&self, code: &str) -> Result<Room, AppError> {
        self.load(code).await
    }

    /// Create a room with the caller as its admin.
    pub async fn create_room(&self, admin_id: &str, admin_name: &str) -> Result<Room, AppError> {
        let mut code = Self::generate_code();
        let mut attempts = 1;
        while self.store.room_exists(&code).await? {
            if attempts >= MAX_CODE_ATTEMPTS {
                return Err(AppError::Store(crate::store::StoreError::Backend(
                    anyhow::anyhow!("could not allocate a unique room code"),
                )));
            }
            code = Self::generate_code();
            attempts += 1;
        }

        let room = Room {
            code: code.clone(),
            admin_id: admin_id.to_string(),
            admin_name: admin_name.to_string(),
            participants: vec![Participant {
                id: admin_id.to_string(),
                name: admin_name.to_string(),
                is_admin: true,
            }],
            tickets: Vec::new(),
            current_ticket_index: 0,
            status: RoomStatus::Active,
            planning_started: false,
            created_at: Utc::now(),
            paused_at: None,
        };

        self.store.put_room(&room).await?;
        tracing::info!("Room {} created by {}", room.code, admin_name);
        Ok(room)
    }

    /// Join a room, resolving reconnects by name.
    pub async fn join_room(
        &self,
        code: &str,
        candidate_id: &str,
        name: &str,
    ) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        let JoinOutcome {
            participant,
            is_reconnect,
        } = resolve_join(&mut room, candidate_id, name);
        self.store.put_room(&room).await?;
        if is_reconnect {
            tracing::debug!("{} reconnected to room {}", participant.name, room.code);
        } else {
            tracing::info!("{} joined room {}", participant.name, room.code);
        }
        Ok(room)
    }

    /// Replace the ticket list wholesale, grouped by parent so that
    /// siblings are voted on consecutively. Prior votes, reveals, and agreed
    /// points are gone with the old list.
    pub async fn upload_tickets(
        &self,
        code: &str,
        uploads: Vec<TicketUpload>,
    ) -> Result<Room, AppError> {
        if uploads.is_empty() {
            return Err(AppError::Validation(
                "At least one ticket is required".to_string(),
            ));
        }

        let mut room = self.load(code).await?;
        let tickets: Vec<Ticket> = uploads.into_iter().map(Ticket::from).collect();
        room.tickets = flatten_groups(group_by_parent(&tickets));
        room.current_ticket_index = 0;
        room.status = RoomStatus::Active;
        self.store.put_room(&room).await?;
        tracing::info!("Room {}: {} tickets uploaded", room.code, room.tickets.len());
        Ok(room)
    }

    /// Re-sequence tickets before planning starts. The supplied ids must be
    /// exactly the existing ticket ids; the full set is validated before
    /// anything is written back.
    pub async fn reorder_tickets(
        &self,
        code: &str,
        ordered_ids: &[String],
    ) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.planning_started {
            return Err(AppError::PreconditionFailed(
                "Tickets cannot be reordered after planning has started".to_string(),
            ));
        }
        if room.tickets.is_empty() {
            return Err(AppError::PreconditionFailed(
                "Room has no tickets to reorder".to_string(),
            ));
        }
        if ordered_ids.len() != room.tickets.len() {
            return Err(AppError::Validation(
                "Ticket id list does not match the room's tickets".to_string(),
            ));
        }

        let mut reordered = Vec::with_capacity(room.tickets.len());
        for id in ordered_ids {
            match room.tickets.iter().find(|t| &t.id == id) {
                Some(ticket) => reordered.push(ticket.clone()),
                None => {
                    return Err(AppError::Validation(
                        "Ticket id list does not match the room's tickets".to_string(),
                    ))
                }
            }
        }
        // Duplicate ids would collapse the set; same length + all found
        // still permits dupes, so check distinctness explicitly.
        let mut seen: Vec<&String> = Vec::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if seen.contains(&id) {
                return Err(AppError::Validation(
                    "Ticket id list contains duplicates".to_string(),
                ));
            }
            seen.push(id);
        }

        room.tickets = reordered;
        self.store.put_room(&room).await?;
        Ok(room)
    }

    /// Freeze the ticket order and move to the first ticket. Calling twice
    /// is rejected, not silently accepted.
    pub async fn start_planning(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.planning_started {
            return Err(AppError::PreconditionFailed(
                "Planning has already started".to_string(),
            ));
        }
        if room.tickets.is_empty() {
            return Err(AppError::PreconditionFailed(
                "Cannot start planning with no tickets".to_string(),
            ));
        }
        room.planning_started = true;
        room.current_ticket_index = 0;
        room.status = RoomStatus::Active;
        self.store.put_room(&room).await?;
        tracing::info!("Room {}: planning started", room.code);
        Ok(room)
    }

    /// Advance to the next ticket; a no-op at the last ticket.
    pub async fn next_ticket(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.current_ticket_index + 1 < room.tickets.len() {
            room.current_ticket_index += 1;
        }
        self.store.put_room(&room).await?;
        Ok(room)
    }

    /// Step back to the previous ticket; a no-op at the first ticket.
    pub async fn prev_ticket(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.current_ticket_index > 0 {
            room.current_ticket_index -= 1;
        }
        self.store.put_room(&room).await?;
        Ok(room)
    }

    pub async fn pause(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.status == RoomStatus::Completed {
            return Err(AppError::PreconditionFailed(
                "Session is already completed".to_string(),
            ));
        }
        room.status = RoomStatus::Paused;
        room.paused_at = Some(Utc::now());
        self.store.put_room(&room).await?;
        Ok(room)
    }

    pub async fn resume(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.status != RoomStatus::Paused {
            return Err(AppError::PreconditionFailed(
                "Session is not paused".to_string(),
            ));
        }
        room.status = RoomStatus::Active;
        room.paused_at = None;
        self.store.put_room(&room).await?;
        Ok(room)
    }

    /// Complete the session. Applies from any state; `completed` is
    /// terminal.
    pub async fn end(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        room.status = RoomStatus::Completed;
        self.store.put_room(&room).await?;
        tracing::info!("Room {}: session completed", room.code);
        Ok(room)
    }

    /// Cast or replace a vote on the current ticket.
    pub async fn vote(
        &self,
        code: &str,
        voter_id: &str,
        voter_name: &str,
        value: u32,
    ) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.tickets.is_empty() {
            return Err(AppError::PreconditionFailed(
                "Room has no tickets".to_string(),
            ));
        }
        if room.status != RoomStatus::Active {
            return Err(AppError::PreconditionFailed(
                "Session is not active".to_string(),
            ));
        }
        let Some(ticket) = room.current_ticket_mut() else {
            return Err(AppError::PreconditionFailed(
                "Room has no current ticket".to_string(),
            ));
        };
        if ticket.is_revealed {
            return Err(AppError::PreconditionFailed(
                "Votes are already revealed for this ticket".to_string(),
            ));
        }

        // Last write wins per voter; no vote history is kept.
        ticket.votes.retain(|v| v.voter_id != voter_id);
        ticket.votes.push(shared::Vote {
            voter_id: voter_id.to_string(),
            voter_name: voter_name.to_string(),
            value,
        });

        self.store.put_room(&room).await?;
        Ok(room)
    }

    /// Close the round on the current ticket and make votes visible.
    /// Revealing with zero votes is legal.
    pub async fn reveal(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.tickets.is_empty() {
            return Err(AppError::PreconditionFailed(
                "Room has no tickets".to_string(),
            ));
        }
        if let Some(ticket) = room.current_ticket_mut() {
            ticket.is_revealed = true;
        }
        self.store.put_room(&room).await?;
        Ok(room)
    }

    /// Restart the current round: votes cleared, reveal and agreed points
    /// undone.
    pub async fn reset_votes(&self, code: &str) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.tickets.is_empty() {
            return Err(AppError::PreconditionFailed(
                "Room has no tickets".to_string(),
            ));
        }
        if let Some(ticket) = room.current_ticket_mut() {
            ticket.votes.clear();
            ticket.is_revealed = false;
            ticket.agreed_points = None;
        }
        self.store.put_room(&room).await?;
        Ok(room)
    }

    /// Record the admin-ratified estimate for the current ticket. Only
    /// legal after reveal; the value is not restricted to the voting scale.
    pub async fn set_agreed_points(&self, code: &str, points: f64) -> Result<Room, AppError> {
        let mut room = self.load(code).await?;
        if room.tickets.is_empty() {
            return Err(AppError::PreconditionFailed(
                "Room has no tickets".to_string(),
            ));
        }
        let Some(ticket) = room.current_ticket_mut() else {
            return Err(AppError::PreconditionFailed(
                "Room has no current ticket".to_string(),
            ));
        };
        if !ticket.is_revealed {
            return Err(AppError::PreconditionFailed(
                "Votes must be revealed before agreeing on points".to_string(),
            ));
        }
        ticket.agreed_points = Some(points);
        self.store.put_room(&room).await?;
        Ok(room)
    }

    /// Grouped read-only view of the room with estimation totals. Computed
    /// on demand; nothing is written back.
    pub async fn session_summary(&self, code: &str) -> Result<SessionSummary, AppError> {
        let room = self.load(code).await?;
        let totals = room.estimation_totals();
        Ok(SessionSummary {
            room_code: room.code.clone(),
            status: room.status,
            total_tickets: room.tickets.len(),
            estimated_tickets: totals.estimated_tickets,
            total_points: totals.total_points,
            average_points: totals.average_points,
            groups: group_by_parent(&room.tickets),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> RoomService {
        let store = Store::new(
            Arc::new(MemoryStore::new()),
            Duration::from_secs(3600),
            Duration::from_secs(86400),
        );
        RoomService::new(store)
    }

    fn upload(key: &str, parent: Option<(&str, &str)>) -> TicketUpload {
        TicketUpload {
            id: Some(format!("id-{key}")),
            key: key.to_string(),
            summary: format!("Summary {key}"),
            assignee: None,
            description: None,
            parent_key: parent.map(|(k, _)| k.to_string()),
            parent_summary: parent.map(|(_, s)| s.to_string()),
        }
    }

    async fn room_with_tickets(service: &RoomService, count: usize) -> Room {
        let room = service.create_room("admin-1", "Ann").await.unwrap();
        let uploads: Vec<TicketUpload> = (0..count)
            .map(|i| upload(&format!("T-{i}"), None))
            .collect();
        service.upload_tickets(&room.code, uploads).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_room() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();

        assert_eq!(room.code.len(), 6);
        assert!(room
            .code
            .bytes()
            .all(|b| ROOM_CODE_ALPHABET.contains(&b)));
        assert_eq!(room.status, RoomStatus::Active);
        assert!(!room.planning_started);
        assert!(room.tickets.is_empty());
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].name, "Ann");
        assert!(room.participants[0].is_admin);
    }

    #[tokio::test]
    async fn test_get_room_is_case_insensitive_on_code() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();
        let found = service.get_room(&room.code.to_lowercase()).await.unwrap();
        assert_eq!(found.code, room.code);
    }

    #[tokio::test]
    async fn test_get_missing_room() {
        let service = service();
        let err = service.get_room("ZZZZZZ").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_upload_groups_siblings_and_resets_index() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();
        let uploaded = service
            .upload_tickets(
                &room.code,
                vec![
                    upload("A-1", None),
                    upload("A-2", Some(("EPIC-1", "Checkout"))),
                    upload("A-3", Some(("EPIC-1", "Checkout"))),
                ],
            )
            .await
            .unwrap();

        let keys: Vec<&str> = uploaded.tickets.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["A-2", "A-3", "A-1"]);
        assert_eq!(uploaded.current_ticket_index, 0);
    }

    #[tokio::test]
    async fn test_upload_replaces_prior_state() {
        let service = service();
        let room = room_with_tickets(&service, 2).await;
        service.vote(&room.code, "u1", "Bob", 4).await.unwrap();
        service.reveal(&room.code).await.unwrap();

        let replaced = service
            .upload_tickets(&room.code, vec![upload("B-1", None)])
            .await
            .unwrap();
        assert_eq!(replaced.tickets.len(), 1);
        assert!(replaced.tickets[0].votes.is_empty());
        assert!(!replaced.tickets[0].is_revealed);
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_list() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();
        let err = service
            .upload_tickets(&room.code, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reorder_tickets() {
        let service = service();
        let room = room_with_tickets(&service, 3).await;
        let reordered = service
            .reorder_tickets(
                &room.code,
                &[
                    "id-T-2".to_string(),
                    "id-T-0".to_string(),
                    "id-T-1".to_string(),
                ],
            )
            .await
            .unwrap();
        let keys: Vec<&str> = reordered.tickets.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["T-2", "T-0", "T-1"]);
    }

    #[tokio::test]
    async fn test_reorder_rejected_after_planning_started() {
        let service = service();
        let room = room_with_tickets(&service, 2).await;
        service.start_planning(&room.code).await.unwrap();

        let err = service
            .reorder_tickets(&room.code, &["id-T-1".to_string(), "id-T-0".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));

        // Order unchanged.
        let room = service.get_room(&room.code).await.unwrap();
        assert_eq!(room.tickets[0].key, "T-0");
    }

    #[tokio::test]
    async fn test_reorder_rejects_id_set_mismatch() {
        let service = service();
        let room = room_with_tickets(&service, 2).await;

        // Wrong size.
        let err = service
            .reorder_tickets(&room.code, &["id-T-0".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Unknown id.
        let err = service
            .reorder_tickets(&room.code, &["id-T-0".to_string(), "id-nope".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Duplicate id.
        let err = service
            .reorder_tickets(&room.code, &["id-T-0".to_string(), "id-T-0".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Room untouched by all three rejections.
        let unchanged = service.get_room(&room.code).await.unwrap();
        let keys: Vec<&str> = unchanged.tickets.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["T-0", "T-1"]);
    }

    #[tokio::test]
    async fn test_start_planning_rejects_duplicate_start() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        let started = service.start_planning(&room.code).await.unwrap();
        assert!(started.planning_started);

        let err = service.start_planning(&room.code).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_start_planning_requires_tickets() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();
        let err = service.start_planning(&room.code).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_next_prev_clamp_at_bounds() {
        let service = service();
        let room = room_with_tickets(&service, 2).await;

        // prev at index 0 is a no-op.
        let room = service.prev_ticket(&room.code).await.unwrap();
        assert_eq!(room.current_ticket_index, 0);

        let room = service.next_ticket(&room.code).await.unwrap();
        assert_eq!(room.current_ticket_index, 1);

        // next at the last index is a no-op.
        let room = service.next_ticket(&room.code).await.unwrap();
        assert_eq!(room.current_ticket_index, 1);

        let room = service.prev_ticket(&room.code).await.unwrap();
        assert_eq!(room.current_ticket_index, 0);
    }

    #[tokio::test]
    async fn test_pause_resume_cycle() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;

        let paused = service.pause(&room.code).await.unwrap();
        assert_eq!(paused.status, RoomStatus::Paused);
        assert!(paused.paused_at.is_some());

        let resumed = service.resume(&room.code).await.unwrap();
        assert_eq!(resumed.status, RoomStatus::Active);
        assert!(resumed.paused_at.is_none());
    }

    #[tokio::test]
    async fn test_resume_requires_paused() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        let err = service.resume(&room.code).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_completed_is_terminal_for_pause() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        service.end(&room.code).await.unwrap();

        let err = service.pause(&room.code).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_end_applies_from_paused() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        service.pause(&room.code).await.unwrap();
        let ended = service.end(&room.code).await.unwrap();
        assert_eq!(ended.status, RoomStatus::Completed);
    }

    #[tokio::test]
    async fn test_vote_replaces_prior_vote() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;

        service.vote(&room.code, "u1", "Bob", 4).await.unwrap();
        let room = service.vote(&room.code, "u1", "Bob", 8).await.unwrap();

        let votes = &room.tickets[0].votes;
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].value, 8);
    }

    #[tokio::test]
    async fn test_vote_after_reveal_rejected() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        service.vote(&room.code, "u1", "Bob", 4).await.unwrap();
        service.reveal(&room.code).await.unwrap();

        let err = service.vote(&room.code, "u2", "Cara", 8).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));

        // Votes unchanged until a reset.
        let room = service.get_room(&room.code).await.unwrap();
        assert_eq!(room.tickets[0].votes.len(), 1);

        service.reset_votes(&room.code).await.unwrap();
        let room = service.vote(&room.code, "u2", "Cara", 8).await.unwrap();
        assert_eq!(room.tickets[0].votes.len(), 1);
        assert_eq!(room.tickets[0].votes[0].voter_id, "u2");
    }

    #[tokio::test]
    async fn test_vote_rejected_while_paused() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        service.pause(&room.code).await.unwrap();

        let err = service.vote(&room.code, "u1", "Bob", 4).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));

        let room = service.get_room(&room.code).await.unwrap();
        assert!(room.tickets[0].votes.is_empty());
        assert_eq!(room.status, RoomStatus::Paused);
    }

    #[tokio::test]
    async fn test_vote_requires_tickets() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();
        let err = service.vote(&room.code, "u1", "Bob", 4).await.unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn test_reveal_with_no_votes_is_legal() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        let room = service.reveal(&room.code).await.unwrap();
        assert!(room.tickets[0].is_revealed);
        assert!(room.tickets[0].votes.is_empty());
    }

    #[tokio::test]
    async fn test_reset_restarts_round() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        service.vote(&room.code, "u1", "Bob", 4).await.unwrap();
        service.reveal(&room.code).await.unwrap();
        service.set_agreed_points(&room.code, 5.0).await.unwrap();

        let room = service.reset_votes(&room.code).await.unwrap();
        let ticket = &room.tickets[0];
        assert!(ticket.votes.is_empty());
        assert!(!ticket.is_revealed);
        assert!(ticket.agreed_points.is_none());
    }

    #[tokio::test]
    async fn test_agree_before_reveal_rejected() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;

        let err = service
            .set_agreed_points(&room.code, 5.0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PreconditionFailed(_)));

        let room = service.get_room(&room.code).await.unwrap();
        assert!(room.tickets[0].agreed_points.is_none());
    }

    #[tokio::test]
    async fn test_agree_after_reveal() {
        let service = service();
        let room = room_with_tickets(&service, 1).await;
        service.reveal(&room.code).await.unwrap();

        // Not constrained to the voting scale.
        let room = service.set_agreed_points(&room.code, 5.0).await.unwrap();
        assert_eq!(room.tickets[0].agreed_points, Some(5.0));
    }

    #[tokio::test]
    async fn test_join_reconnect_same_identity() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();

        let joined = service.join_room(&room.code, "bob-1", "Bob").await.unwrap();
        assert_eq!(joined.participants.len(), 2);

        let rejoined = service
            .join_room(&room.code, "bob-other", "bob")
            .await
            .unwrap();
        assert_eq!(rejoined.participants.len(), 2);
        let bob = rejoined
            .participants
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case("bob"))
            .unwrap();
        assert_eq!(bob.id, "bob-1");
    }

    #[tokio::test]
    async fn test_join_missing_room() {
        let service = service();
        let err = service
            .join_room("ZZZZZZ", "bob-1", "Bob")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_session_summary() {
        let service = service();
        let room = service.create_room("admin-1", "Ann").await.unwrap();
        service
            .upload_tickets(
                &room.code,
                vec![
                    upload("A-1", None),
                    upload("A-2", Some(("EPIC-1", "Checkout"))),
                ],
            )
            .await
            .unwrap();
        service.reveal(&room.code).await.unwrap();
        service.set_agreed_points(&room.code, 5.0).await.unwrap();

        let summary = service.session_summary(&room.code).await.unwrap();
        assert_eq!(summary.room_code, room.code);
        assert_eq!(summary.total_tickets, 2);
        assert_eq!(summary.estimated_tickets, 1);
        assert_eq!(summary.total_points, 5.0);
        assert_eq!(summary.average_points, 5.0);
        assert_eq!(summary.groups.len(), 2);
        assert_eq!(summary.groups[0].parent_key.as_deref(), Some("EPIC-1"));
    }
}
