use chrono::Utc;
use mongodb::{
    Collection, Database,
    bson::{Document, doc},
    options::{FindOneAndUpdateOptions, ReturnDocument},
};

use crate::error::AppError;

/// Atomic per-record-type counters for order and ticket numbers.
///
/// Each call is one `$inc` upsert, so concurrent creates can never observe
/// the same value.
#[derive(Clone)]
pub struct SequenceService {
    counters: Collection<Document>,
}

impl SequenceService {
    pub fn new(db: &Database) -> Self {
        Self {
            counters: db.collection("counters"),
        }
    }

    async fn next(&self, sequence: &str) -> Result<i64, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": sequence },
                doc! { "$inc": { "seq": 1_i64 } },
                options,
            )
            .await?
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!("Counter {} not returned", sequence))
            })?;

        counter
            .get_i64("seq")
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("Malformed counter: {}", e)))
    }

    /// `SO-<millis>-<seq>`, the storefront's visible order numbering.
    pub async fn next_order_number(&self) -> Result<String, AppError> {
        let seq = self.next("sales_orders").await?;
        Ok(format!("SO-{}-{:04}", Utc::now().timestamp_millis(), seq))
    }

    /// `SR-<millis>-<seq>` for service tickets.
    pub async fn next_ticket_number(&self) -> Result<String, AppError> {
        let seq = self.next("service_requests").await?;
        Ok(format!("SR-{}-{:04}", Utc::now().timestamp_millis(), seq))
    }
}
