use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Address;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServiceType {
    Installation,
    Repair,
    Maintenance,
    Inspection,
    Emergency,
    Warranty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Assigned => "Assigned",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::OnHold => "On Hold",
            TicketStatus::Completed => "Completed",
            TicketStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }

    /// Legal edges for the generic status update. The dedicated assign and
    /// complete operations act from any non-terminal state instead.
    pub fn can_transition_to(&self, next: TicketStatus) -> bool {
        if next == TicketStatus::Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (TicketStatus::Open, TicketStatus::Assigned)
                | (TicketStatus::Open, TicketStatus::InProgress)
                | (TicketStatus::Assigned, TicketStatus::InProgress)
                | (TicketStatus::InProgress, TicketStatus::OnHold)
                | (TicketStatus::InProgress, TicketStatus::Completed)
                | (TicketStatus::OnHold, TicketStatus::InProgress)
                | (TicketStatus::OnHold, TicketStatus::Completed)
        )
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartUsed {
    pub part_name: String,
    pub quantity: i64,
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerFeedback {
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_id: String,
    pub ticket_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genset_id: Option<String>,
    pub service_type: ServiceType,
    pub priority: Priority,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_technician: Option<String>,
    pub status: TicketStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::opt_chrono_datetime_as_bson_datetime"
    )]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::opt_chrono_datetime_as_bson_datetime"
    )]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_location: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub parts_used: Vec<PartUsed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_feedback: Option<CustomerFeedback>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_id: String,
        ticket_number: String,
        genset_id: Option<String>,
        service_type: ServiceType,
        priority: Priority,
        description: String,
        contact_number: Option<String>,
        service_location: Option<Address>,
        estimated_cost: Option<f64>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            ticket_number,
            genset_id,
            service_type,
            priority,
            description,
            contact_number,
            assigned_technician: None,
            status: TicketStatus::Open,
            scheduled_date: None,
            completed_date: None,
            service_location,
            estimated_cost,
            actual_cost: None,
            parts_used: Vec::new(),
            technician_notes: None,
            customer_feedback: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ticket_starts_open_without_feedback() {
        let ticket = ServiceRequest::new(
            Uuid::new_v4().to_string(),
            "SR-1-0001".to_string(),
            None,
            ServiceType::Repair,
            Priority::Medium,
            "Genset will not start".to_string(),
            Some("555-0101".to_string()),
            None,
            None,
        );
        assert_eq!(ticket.status, TicketStatus::Open);
        assert!(ticket.customer_feedback.is_none());
        assert!(ticket.assigned_technician.is_none());
        assert!(ticket.parts_used.is_empty());
    }

    #[test]
    fn forward_edges_are_legal() {
        use TicketStatus::*;
        assert!(Open.can_transition_to(Assigned));
        assert!(Open.can_transition_to(InProgress));
        assert!(Assigned.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(OnHold));
        assert!(InProgress.can_transition_to(Completed));
        assert!(OnHold.can_transition_to(InProgress));
        assert!(OnHold.can_transition_to(Completed));
    }

    #[test]
    fn cancel_only_from_non_terminal_states() {
        use TicketStatus::*;
        for from in [Open, Assigned, InProgress, OnHold] {
            assert!(from.can_transition_to(Cancelled), "{} -> Cancelled", from);
        }
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn backward_and_terminal_jumps_are_rejected() {
        use TicketStatus::*;
        assert!(!Completed.can_transition_to(Open));
        assert!(!Cancelled.can_transition_to(InProgress));
        assert!(!Assigned.can_transition_to(Open));
        assert!(!Open.can_transition_to(Completed));
    }
}
