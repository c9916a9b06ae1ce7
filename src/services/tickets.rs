use std::collections::HashMap;

use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::FindOptions,
};
use uuid::Uuid;

use crate::dtos::service_requests::{
    AssignTicketRequest, CompleteTicketRequest, CreateTicketRequest, FeedbackRequest, TicketQuery,
    TicketView,
};
use crate::dtos::{CustomerSummary, GensetSummary};
use crate::error::AppError;
use crate::middleware::policy;
use crate::models::{Customer, CustomerFeedback, Genset, ServiceRequest, TicketStatus};
use crate::services::{MongoDb, SequenceService, jwt::Claims};

/// Service-ticket lifecycle manager: creation, staff-only assignment and
/// status handling, completion, and customer feedback.
#[derive(Clone)]
pub struct TicketService {
    db: MongoDb,
    sequence: SequenceService,
}

impl TicketService {
    pub fn new(db: MongoDb, sequence: SequenceService) -> Self {
        Self { db, sequence }
    }

    /// The caller becomes the ticket's customer. An optional catalog
    /// reference must at least be a well-formed id.
    pub async fn create(
        &self,
        caller: &Claims,
        req: CreateTicketRequest,
    ) -> Result<TicketView, AppError> {
        let genset_id = match req.genset_id.as_deref() {
            None | Some("") => None,
            Some(id) => {
                Uuid::parse_str(id)
                    .map_err(|_| AppError::BadRequest(anyhow::anyhow!("Invalid genset ID")))?;
                Some(id.to_string())
            }
        };

        let ticket_number = self.sequence.next_ticket_number().await?;
        let ticket = ServiceRequest::new(
            caller.sub.clone(),
            ticket_number,
            genset_id,
            req.service_type,
            req.priority,
            req.description,
            req.contact_number,
            req.service_location,
            req.estimated_cost,
        );

        self.db.service_requests().insert_one(&ticket, None).await?;
        tracing::info!(
            ticket_id = %ticket.id,
            ticket_number = %ticket.ticket_number,
            "Service request created"
        );

        self.resolve_view(ticket).await
    }

    /// Staff see everything; customers are implicitly filtered to their
    /// own tickets, whatever the query says.
    pub async fn list(&self, caller: &Claims, query: TicketQuery) -> Result<Vec<TicketView>, AppError> {
        let mut filter = doc! {};
        if let Some(status) = query.status {
            filter.insert("status", bson::to_bson(&status)?);
        }
        if let Some(service_type) = query.service_type {
            filter.insert("service_type", bson::to_bson(&service_type)?);
        }
        if let Some(priority) = query.priority {
            filter.insert("priority", bson::to_bson(&priority)?);
        }
        if let Some(customer_id) = query.customer_id {
            filter.insert("customer_id", customer_id);
        }
        if !caller.role.is_staff() {
            filter.insert("customer_id", &caller.sub);
        }

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let tickets: Vec<ServiceRequest> = self
            .db
            .service_requests()
            .find(filter, options)
            .await?
            .try_collect()
            .await?;

        self.resolve_views(tickets).await
    }

    pub async fn by_customer(
        &self,
        caller: &Claims,
        customer_id: &str,
    ) -> Result<Vec<TicketView>, AppError> {
        policy::require_owner_or_staff(caller, customer_id)?;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let tickets: Vec<ServiceRequest> = self
            .db
            .service_requests()
            .find(doc! { "customer_id": customer_id }, options)
            .await?
            .try_collect()
            .await?;

        self.resolve_views(tickets).await
    }

    pub async fn get(&self, caller: &Claims, id: &str) -> Result<TicketView, AppError> {
        let ticket = self.ticket_by_id(id).await?;
        policy::require_owner_or_staff(caller, &ticket.customer_id)?;
        self.resolve_view(ticket).await
    }

    /// Sets technician, scheduled date, and Assigned in one step. The
    /// technician reference is stored as given; no role check, matching the
    /// dispatch desk's workflow where staff pick from their own roster.
    pub async fn assign(
        &self,
        id: &str,
        req: AssignTicketRequest,
    ) -> Result<ServiceRequest, AppError> {
        let mut ticket = self.ticket_by_id(id).await?;
        if ticket.status.is_terminal() {
            return Err(AppError::InvalidTransition {
                from: ticket.status.to_string(),
                to: TicketStatus::Assigned.to_string(),
            });
        }

        ticket.assigned_technician = Some(req.technician_id);
        ticket.scheduled_date = req.scheduled_date;
        ticket.status = TicketStatus::Assigned;
        ticket.updated_at = chrono::Utc::now();

        let scheduled = ticket.scheduled_date.map(bson::DateTime::from_chrono);
        self.db
            .service_requests()
            .update_one(
                doc! { "_id": &ticket.id },
                doc! { "$set": {
                    "assigned_technician": ticket.assigned_technician.as_deref(),
                    "scheduled_date": scheduled,
                    "status": bson::to_bson(&ticket.status)?,
                    "updated_at": bson::DateTime::from_chrono(ticket.updated_at),
                } },
                None,
            )
            .await?;

        tracing::info!(ticket_id = %ticket.id, "Technician assigned");
        Ok(ticket)
    }

    pub async fn update_status(
        &self,
        id: &str,
        next: TicketStatus,
    ) -> Result<ServiceRequest, AppError> {
        let mut ticket = self.ticket_by_id(id).await?;
        let prev = ticket.status;
        if !prev.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: prev.to_string(),
                to: next.to_string(),
            });
        }

        ticket.status = next;
        ticket.updated_at = chrono::Utc::now();
        self.db
            .service_requests()
            .update_one(
                doc! { "_id": &ticket.id },
                doc! { "$set": {
                    "status": bson::to_bson(&next)?,
                    "updated_at": bson::DateTime::from_chrono(ticket.updated_at),
                } },
                None,
            )
            .await?;

        tracing::info!(ticket_id = %ticket.id, from = %prev, to = %next, "Ticket status updated");
        Ok(ticket)
    }

    /// Close out the work: Completed, completion timestamp, actual cost,
    /// parts, notes. Does not require a prior Assigned/In Progress state.
    pub async fn complete(
        &self,
        id: &str,
        req: CompleteTicketRequest,
    ) -> Result<ServiceRequest, AppError> {
        let mut ticket = self.ticket_by_id(id).await?;
        if ticket.status.is_terminal() {
            return Err(AppError::InvalidTransition {
                from: ticket.status.to_string(),
                to: TicketStatus::Completed.to_string(),
            });
        }

        ticket.status = TicketStatus::Completed;
        ticket.completed_date = Some(chrono::Utc::now());
        ticket.actual_cost = req.actual_cost;
        ticket.parts_used = req.parts_used;
        ticket.technician_notes = req.technician_notes;
        ticket.updated_at = chrono::Utc::now();

        self.db
            .service_requests()
            .update_one(
                doc! { "_id": &ticket.id },
                doc! { "$set": {
                    "status": bson::to_bson(&ticket.status)?,
                    "completed_date": ticket.completed_date.map(bson::DateTime::from_chrono),
                    "actual_cost": ticket.actual_cost,
                    "parts_used": bson::to_bson(&ticket.parts_used)?,
                    "technician_notes": ticket.technician_notes.as_deref(),
                    "updated_at": bson::DateTime::from_chrono(ticket.updated_at),
                } },
                None,
            )
            .await?;

        tracing::info!(ticket_id = %ticket.id, "Service request completed");
        Ok(ticket)
    }

    /// Owner or staff only. Repeated feedback overwrites the previous
    /// rating, it never accumulates.
    pub async fn feedback(
        &self,
        caller: &Claims,
        id: &str,
        req: FeedbackRequest,
    ) -> Result<ServiceRequest, AppError> {
        let mut ticket = self.ticket_by_id(id).await?;
        policy::require_owner_or_staff(caller, &ticket.customer_id)?;

        ticket.customer_feedback = Some(CustomerFeedback {
            rating: req.rating,
            comment: req.comment,
        });
        ticket.updated_at = chrono::Utc::now();

        self.db
            .service_requests()
            .update_one(
                doc! { "_id": &ticket.id },
                doc! { "$set": {
                    "customer_feedback": bson::to_bson(&ticket.customer_feedback)?,
                    "updated_at": bson::DateTime::from_chrono(ticket.updated_at),
                } },
                None,
            )
            .await?;

        Ok(ticket)
    }

    async fn ticket_by_id(&self, id: &str) -> Result<ServiceRequest, AppError> {
        self.db
            .service_requests()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service request not found")))
    }

    async fn resolve_view(&self, ticket: ServiceRequest) -> Result<TicketView, AppError> {
        self.resolve_views(vec![ticket])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Ticket view resolution failed")))
    }

    async fn resolve_views(
        &self,
        tickets: Vec<ServiceRequest>,
    ) -> Result<Vec<TicketView>, AppError> {
        let account_ids: Vec<&str> = tickets
            .iter()
            .flat_map(|t| {
                std::iter::once(t.customer_id.as_str())
                    .chain(t.assigned_technician.as_deref())
            })
            .collect();
        let genset_ids: Vec<&str> = tickets
            .iter()
            .filter_map(|t| t.genset_id.as_deref())
            .collect();

        let accounts: HashMap<String, Customer> = self
            .db
            .customers()
            .find(doc! { "_id": { "$in": account_ids } }, None)
            .await?
            .try_collect::<Vec<Customer>>()
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let gensets: HashMap<String, Genset> = self
            .db
            .gensets()
            .find(doc! { "_id": { "$in": genset_ids } }, None)
            .await?
            .try_collect::<Vec<Genset>>()
            .await?
            .into_iter()
            .map(|g| (g.id.clone(), g))
            .collect();

        Ok(tickets
            .into_iter()
            .map(|ticket| {
                let customer = accounts.get(&ticket.customer_id).map(CustomerSummary::from);
                let technician = ticket
                    .assigned_technician
                    .as_deref()
                    .and_then(|id| accounts.get(id))
                    .map(CustomerSummary::from);
                let genset = ticket
                    .genset_id
                    .as_deref()
                    .and_then(|id| gensets.get(id))
                    .map(GensetSummary::from);
                TicketView::new(ticket, customer, technician, genset)
            })
            .collect())
    }
}
