use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Room aggregate
// ============================================================================

/// Lifecycle of an estimation session. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
}

/// One participant's submission for a ticket. At most one vote per voter id
/// is kept; resubmitting replaces the prior value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voter_id: String,
    pub voter_name: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub key: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_summary: Option<String>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub is_revealed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreed_points: Option<f64>,
}

/// Incoming ticket record from an upload, before the voting fields exist.
/// The id is optional; the server generates one when the tracker export
/// did not carry a stable id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub key: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_summary: Option<String>,
}

impl From<TicketUpload> for Ticket {
    fn from(upload: TicketUpload) -> Self {
        Ticket {
            id: upload.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            key: upload.key,
            summary: upload.summary,
            assignee: upload.assignee,
            description: upload.description,
            parent_key: upload.parent_key,
            parent_summary: upload.parent_summary,
            votes: Vec::new(),
            is_revealed: false,
            agreed_points: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: String,
    pub admin_id: String,
    pub admin_name: String,
    pub participants: Vec<Participant>,
    pub tickets: Vec<Ticket>,
    pub current_ticket_index: usize,
    pub status: RoomStatus,
    pub planning_started: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
}

impl Room {
    /// The ticket currently being voted on, if any tickets exist.
    pub fn current_ticket(&self) -> Option<&Ticket> {
        self.tickets.get(self.current_ticket_index)
    }

    pub fn current_ticket_mut(&mut self) -> Option<&mut Ticket> {
        self.tickets.get_mut(self.current_ticket_index)
    }

    /// Aggregate totals over the tickets that have an agreed estimate.
    pub fn estimation_totals(&self) -> EstimationTotals {
        let estimated: Vec<f64> = self
            .tickets
            .iter()
            .filter_map(|t| t.agreed_points)
            .collect();
        let total_points: f64 = estimated.iter().sum();
        let average_points = if estimated.is_empty() {
            0.0
        } else {
            crate::stats::round_to_tenth(total_points / estimated.len() as f64)
        };
        EstimationTotals {
            estimated_tickets: estimated.len(),
            total_points,
            average_points,
        }
    }
}

/// Totals derived from agreed points, shared by reports and the session
/// summary view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationTotals {
    pub estimated_tickets: usize,
    pub total_points: f64,
    pub average_points: f64,
}

/// On-demand grouped view of a live room, for the summary screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub room_code: String,
    pub status: RoomStatus,
    pub total_tickets: usize,
    pub estimated_tickets: usize,
    pub total_points: f64,
    pub average_points: f64,
    pub groups: Vec<crate::grouping::TicketGroup>,
}

// ============================================================================
// Reports
// ============================================================================

/// Per-ticket detail captured in a saved report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTicket {
    pub key: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_summary: Option<String>,
    pub votes: Vec<Vote>,
    pub average_vote: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreed_points: Option<f64>,
}

/// Immutable snapshot of a room at save time. Outlives the room that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedReport {
    pub id: String,
    pub name: String,
    pub room_code: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub total_tickets: usize,
    pub estimated_tickets: usize,
    pub total_points: f64,
    pub average_points: f64,
    pub participants: Vec<String>,
    pub tickets: Vec<ReportTicket>,
}

/// Lightweight summary for report listings, no per-ticket detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListItem {
    pub id: String,
    pub name: String,
    pub room_code: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub total_tickets: usize,
    pub estimated_tickets: usize,
    pub total_points: f64,
    pub average_points: f64,
}

impl From<&SavedReport> for ReportListItem {
    fn from(report: &SavedReport) -> Self {
        ReportListItem {
            id: report.id.clone(),
            name: report.name.clone(),
            room_code: report.room_code.clone(),
            created_at: report.created_at,
            created_by: report.created_by.clone(),
            total_tickets: report.total_tickets,
            estimated_tickets: report.estimated_tickets,
            total_points: report.total_points,
            average_points: report.average_points,
        }
    }
}

// ============================================================================
// API envelope
// ============================================================================

/// Response envelope shared with the polling web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
