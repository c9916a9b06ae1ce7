use chrono::{DateTime, NaiveDate, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, DateTime as BsonDateTime, Document, doc};

use crate::dtos::reports::{DashboardStats, SalesReport, ServiceMetrics, StatusMetric};
use crate::error::AppError;
use crate::models::Genset;
use crate::services::MongoDb;

/// Read-only aggregates for the dashboard and the two reports. All of it is
/// group-and-sum pipelines over the order and ticket collections.
#[derive(Clone)]
pub struct ReportService {
    db: MongoDb,
}

impl ReportService {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let total_gensets = self
            .db
            .gensets()
            .count_documents(doc! { "is_active": true }, None)
            .await?;
        let low_stock_count = self
            .db
            .gensets()
            .count_documents(doc! { "stock": { "$lte": 5 }, "is_active": true }, None)
            .await?;
        let pending_orders = self
            .db
            .sales_orders()
            .count_documents(
                doc! { "status": { "$in": ["Quotation", "Confirmed", "In Production"] } },
                None,
            )
            .await?;
        let open_service_requests = self
            .db
            .service_requests()
            .count_documents(
                doc! { "status": { "$in": ["Open", "Assigned", "In Progress"] } },
                None,
            )
            .await?;

        Ok(DashboardStats {
            total_gensets,
            low_stock_count,
            pending_orders,
            open_service_requests,
        })
    }

    pub async fn low_stock(&self, threshold: i64) -> Result<Vec<Genset>, AppError> {
        let gensets = self
            .db
            .gensets()
            .find(
                doc! { "stock": { "$lte": threshold }, "is_active": true },
                None,
            )
            .await?
            .try_collect()
            .await?;
        Ok(gensets)
    }

    /// Totals over non-Cancelled orders created in the window.
    pub async fn sales_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SalesReport, AppError> {
        let pipeline = vec![
            doc! { "$match": {
                "created_at": {
                    "$gte": BsonDateTime::from_chrono(start),
                    "$lte": BsonDateTime::from_chrono(end),
                },
                "status": { "$ne": "Cancelled" },
            } },
            doc! { "$group": {
                "_id": null,
                "total_orders": { "$sum": 1 },
                "total_revenue": { "$sum": "$total_amount" },
                "average_order_value": { "$avg": "$total_amount" },
            } },
        ];

        let mut cursor = self.db.sales_orders().aggregate(pipeline, None).await?;
        match cursor.try_next().await? {
            Some(row) => Ok(SalesReport {
                total_orders: get_i64(&row, "total_orders"),
                total_revenue: get_f64(&row, "total_revenue"),
                average_order_value: get_f64(&row, "average_order_value"),
            }),
            None => Ok(SalesReport {
                total_orders: 0,
                total_revenue: 0.0,
                average_order_value: 0.0,
            }),
        }
    }

    /// Per-status ticket counts with average actual cost, plus the overall
    /// average feedback rating across all rated tickets.
    pub async fn service_metrics(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<ServiceMetrics, AppError> {
        let status_pipeline = vec![
            doc! { "$match": {
                "created_at": {
                    "$gte": BsonDateTime::from_chrono(start),
                    "$lte": BsonDateTime::from_chrono(end),
                },
            } },
            doc! { "$group": {
                "_id": "$status",
                "count": { "$sum": 1 },
                "avg_cost": { "$avg": "$actual_cost" },
            } },
        ];

        let mut status_breakdown = Vec::new();
        let mut cursor = self
            .db
            .service_requests()
            .aggregate(status_pipeline, None)
            .await?;
        while let Some(row) = cursor.try_next().await? {
            status_breakdown.push(StatusMetric {
                status: row.get_str("_id").unwrap_or_default().to_string(),
                count: get_i64(&row, "count"),
                avg_cost: row.get_f64("avg_cost").ok(),
            });
        }

        let rating_pipeline = vec![
            doc! { "$match": { "customer_feedback.rating": { "$exists": true } } },
            doc! { "$group": {
                "_id": null,
                "average_rating": { "$avg": "$customer_feedback.rating" },
            } },
        ];
        let mut cursor = self
            .db
            .service_requests()
            .aggregate(rating_pipeline, None)
            .await?;
        let average_rating = match cursor.try_next().await? {
            Some(row) => get_f64(&row, "average_rating"),
            None => 0.0,
        };

        Ok(ServiceMetrics {
            status_breakdown,
            average_rating,
        })
    }
}

/// Accepts RFC 3339 or a plain date (interpreted as midnight UTC).
pub fn parse_date(value: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0)
                .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Invalid date: {}", value)))?,
            Utc,
        ));
    }
    Err(AppError::BadRequest(anyhow::anyhow!(
        "Invalid date: {}",
        value
    )))
}

fn get_i64(row: &Document, key: &str) -> i64 {
    match row.get(key) {
        Some(bson::Bson::Int32(v)) => *v as i64,
        Some(bson::Bson::Int64(v)) => *v,
        Some(bson::Bson::Double(v)) => *v as i64,
        _ => 0,
    }
}

fn get_f64(row: &Document, key: &str) -> f64 {
    match row.get(key) {
        Some(bson::Bson::Double(v)) => *v,
        Some(bson::Bson::Int32(v)) => *v as f64,
        Some(bson::Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_dates_as_midnight_utc() {
        let dt = parse_date("2024-03-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:00:00+00:00");
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let dt = parse_date("2024-03-01T10:30:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_709_289_000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_date("last tuesday").is_err());
    }
}
