use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CustomerSummary, GensetSummary};
use crate::models::{Address, OrderItem, OrderStatus, PaymentMethod, PaymentStatus, SalesOrder};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct OrderItemRequest {
    #[validate(length(min = 1, message = "Each item must reference a genset"))]
    pub genset_id: String,

    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,

    pub discount: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Defaults to the authenticated account when omitted.
    pub customer_id: Option<String>,

    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<OrderItemRequest>,

    pub delivery_address: Option<Address>,
    pub payment_method: PaymentMethod,
    pub shipping_cost: Option<f64>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub customer_id: Option<String>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemView {
    pub genset_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
    pub total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genset: Option<GensetSummary>,
}

impl OrderItemView {
    pub fn new(item: &OrderItem, genset: Option<GensetSummary>) -> Self {
        Self {
            genset_id: item.genset_id.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            discount: item.discount,
            total: item.total,
            genset,
        }
    }
}

/// Read-side order shape: the record plus resolved customer and catalog
/// summaries.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: String,
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
    pub order_number: String,
    pub items: Vec<OrderItemView>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_cost: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderView {
    pub fn new(
        order: SalesOrder,
        customer: Option<CustomerSummary>,
        items: Vec<OrderItemView>,
    ) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            customer,
            order_number: order.order_number,
            items,
            subtotal: order.subtotal,
            tax: order.tax,
            shipping_cost: order.shipping_cost,
            total_amount: order.total_amount,
            status: order.status,
            delivery_address: order.delivery_address,
            payment_status: order.payment_status,
            payment_method: order.payment_method,
            delivery_date: order.delivery_date,
            notes: order.notes,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
