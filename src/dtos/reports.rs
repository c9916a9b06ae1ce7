use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// RFC 3339 timestamp or plain `YYYY-MM-DD` date.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_gensets: u64,
    pub low_stock_count: u64,
    pub pending_orders: u64,
    pub open_service_requests: u64,
}

#[derive(Debug, Serialize)]
pub struct SalesReport {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_order_value: f64,
}

#[derive(Debug, Serialize)]
pub struct StatusMetric {
    pub status: String,
    pub count: i64,
    pub avg_cost: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ServiceMetrics {
    pub status_breakdown: Vec<StatusMetric>,
    pub average_rating: f64,
}
