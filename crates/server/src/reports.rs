//! Immutable report snapshots of a room.
//!
//! A live room is mutable and expires; a saved report copies everything it
//! needs at save time so it stays stable after the room moves on or is
//! gone. Reports are tracked in a newest-first id index kept alongside the
//! report bodies.

use chrono::Utc;
use rand::Rng;
use shared::{calculate_vote_stats, ReportListItem, ReportTicket, SavedReport};

use crate::error::AppError;
use crate::store::Store;

const REPORT_ID_SUFFIX_LEN: usize = 6;

#[derive(Clone)]
pub struct ReportService {
    store: Store,
}

impl ReportService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Millisecond timestamp plus a random suffix: roughly sortable by
    /// creation time, unique in practice.
    fn generate_id() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(REPORT_ID_SUFFIX_LEN)
            .map(|c| (c as char).to_ascii_lowercase())
            .collect();
        format!("{}-{}", Utc::now().timestamp_millis(), suffix)
    }

    /// Snapshot a room into a named report and prepend it to the index.
    pub async fn save_report(
        &self,
        room_code: &str,
        name: &str,
        saved_by: &str,
    ) -> Result<SavedReport, AppError> {
        let room = self
            .store
            .get_room(room_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Room {} not found", room_code.to_uppercase()))
            })?;
        if room.tickets.is_empty() {
            return Err(AppError::PreconditionFailed(
                "Room has no tickets to report on".to_string(),
            ));
        }

        let tickets: Vec<ReportTicket> = room
            .tickets
            .iter()
            .map(|t| ReportTicket {
                key: t.key.clone(),
                summary: t.summary.clone(),
                parent_key: t.parent_key.clone(),
                parent_summary: t.parent_summary.clone(),
                votes: t.votes.clone(),
                average_vote: calculate_vote_stats(&t.votes).average,
                agreed_points: t.agreed_points,
            })
            .collect();

        let totals = room.estimation_totals();
        let report = SavedReport {
            id: Self::generate_id(),
            name: name.to_string(),
            room_code: room.code.clone(),
            created_at: Utc::now(),
            created_by: saved_by.to_string(),
            total_tickets: room.tickets.len(),
            estimated_tickets: totals.estimated_tickets,
            total_points: totals.total_points,
            average_points: totals.average_points,
            participants: room.participants.iter().map(|p| p.name.clone()).collect(),
            tickets,
        };

        // Body first, then the index entry; the index never points at a
        // report that was not written.
        self.store.put_report(&report).await?;
        let mut index = self.store.report_index().await?;
        index.insert(0, report.id.clone());
        self.store.put_report_index(&index).await?;

        tracing::info!("Report {} saved for room {}", report.id, report.room_code);
        Ok(report)
    }

    pub async fn get_report(&self, id: &str) -> Result<SavedReport, AppError> {
        self.store
            .get_report(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {id} not found")))
    }

    /// Summaries in index order, newest first. Index entries whose body has
    /// gone missing are skipped.
    pub async fn list_reports(&self) -> Result<Vec<ReportListItem>, AppError> {
        let index = self.store.report_index().await?;
        let mut items = Vec::with_capacity(index.len());
        for id in &index {
            match self.store.get_report(id).await? {
                Some(report) => items.push(ReportListItem::from(&report)),
                None => tracing::warn!("Report {} is indexed but missing", id),
            }
        }
        Ok(items)
    }

    /// Remove a report and its index entry. Deleting an id that does not
    /// exist is not an error.
    pub async fn delete_report(&self, id: &str) -> Result<(), AppError> {
        self.store.delete_report(id).await?;
        let mut index = self.store.report_index().await?;
        index.retain(|entry| entry != id);
        self.store.put_report_index(&index).await?;
        Ok(())
    }
}
