use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Address;

/// Fixed sales tax rate applied to every order subtotal.
pub const TAX_RATE: f64 = 0.18;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Quotation,
    Confirmed,
    #[serde(rename = "In Production")]
    InProduction,
    #[serde(rename = "Ready for Delivery")]
    ReadyForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Quotation => "Quotation",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::InProduction => "In Production",
            OrderStatus::ReadyForDelivery => "Ready for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Legal edges: each step of the forward path, plus Cancelled from any
    /// non-terminal state. Everything else is rejected.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if next == OrderStatus::Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (OrderStatus::Quotation, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::InProduction)
                | (OrderStatus::InProduction, OrderStatus::ReadyForDelivery)
                | (OrderStatus::ReadyForDelivery, OrderStatus::Delivered)
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Partial,
    Completed,
    Refunded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Credit Card")]
    CreditCard,
    Cheque,
    Financing,
}

/// One order line. Unit price is snapshotted from the catalog at creation
/// and never re-read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub genset_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
    pub total: f64,
}

impl OrderItem {
    pub fn new(genset_id: String, quantity: i64, unit_price: f64, discount: f64) -> Self {
        let total = line_total(unit_price, quantity, discount);
        Self {
            genset_id,
            quantity,
            unit_price,
            discount,
            total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer_id: String,
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping_cost: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::opt_chrono_datetime_as_bson_datetime"
    )]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl SalesOrder {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_id: String,
        order_number: String,
        items: Vec<OrderItem>,
        shipping_cost: f64,
        delivery_address: Option<Address>,
        payment_method: PaymentMethod,
        delivery_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Self {
        let subtotal = subtotal(&items);
        let tax = subtotal * TAX_RATE;
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            order_number,
            items,
            subtotal,
            tax,
            shipping_cost,
            total_amount: subtotal + tax + shipping_cost,
            status: OrderStatus::Quotation,
            delivery_address,
            payment_status: PaymentStatus::Pending,
            payment_method,
            delivery_date,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

pub fn line_total(unit_price: f64, quantity: i64, discount: f64) -> f64 {
    unit_price * quantity as f64 - discount
}

pub fn subtotal(items: &[OrderItem]) -> f64 {
    items.iter().map(|i| i.total).sum()
}
