use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CustomerSummary, GensetSummary};
use crate::models::{
    Address, CustomerFeedback, PartUsed, Priority, ServiceRequest, ServiceType, TicketStatus,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTicketRequest {
    pub genset_id: Option<String>,

    pub service_type: ServiceType,

    #[serde(default = "default_priority")]
    pub priority: Priority,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub contact_number: Option<String>,
    pub service_location: Option<Address>,
    pub estimated_cost: Option<f64>,
}

fn default_priority() -> Priority {
    Priority::Medium
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignTicketRequest {
    #[validate(length(min = 1, message = "Technician is required"))]
    pub technician_id: String,

    pub scheduled_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusRequest {
    pub status: TicketStatus,
}

#[derive(Debug, Deserialize)]
pub struct CompleteTicketRequest {
    pub actual_cost: Option<f64>,
    #[serde(default)]
    pub parts_used: Vec<PartUsed>,
    pub technician_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TicketQuery {
    pub status: Option<TicketStatus>,
    pub service_type: Option<ServiceType>,
    pub priority: Option<Priority>,
    pub customer_id: Option<String>,
}

/// Read-side ticket shape: the record plus resolved customer, technician,
/// and catalog summaries.
#[derive(Debug, Serialize)]
pub struct TicketView {
    pub id: String,
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
    pub ticket_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genset: Option<GensetSummary>,
    pub service_type: ServiceType,
    pub priority: Priority,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_technician: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician: Option<CustomerSummary>,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_location: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    pub parts_used: Vec<PartUsed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_feedback: Option<CustomerFeedback>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TicketView {
    pub fn new(
        ticket: ServiceRequest,
        customer: Option<CustomerSummary>,
        technician: Option<CustomerSummary>,
        genset: Option<GensetSummary>,
    ) -> Self {
        Self {
            id: ticket.id,
            customer_id: ticket.customer_id,
            customer,
            ticket_number: ticket.ticket_number,
            genset_id: ticket.genset_id,
            genset,
            service_type: ticket.service_type,
            priority: ticket.priority,
            description: ticket.description,
            contact_number: ticket.contact_number,
            assigned_technician: ticket.assigned_technician,
            technician,
            status: ticket.status,
            scheduled_date: ticket.scheduled_date,
            completed_date: ticket.completed_date,
            service_location: ticket.service_location,
            estimated_cost: ticket.estimated_cost,
            actual_cost: ticket.actual_cost,
            parts_used: ticket.parts_used,
            technician_notes: ticket.technician_notes,
            customer_feedback: ticket.customer_feedback,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
        }
    }
}
