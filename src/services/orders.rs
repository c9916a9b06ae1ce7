use std::collections::HashMap;

use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc},
    options::FindOptions,
};

use crate::dtos::orders::{CreateOrderRequest, OrderItemView, OrderQuery, OrderView};
use crate::dtos::{CustomerSummary, GensetSummary};
use crate::error::AppError;
use crate::models::{Customer, Genset, OrderItem, OrderStatus, PaymentStatus, SalesOrder};
use crate::services::{MongoDb, SequenceService, jwt::Claims};

/// Order lifecycle manager: pricing at creation, status transitions with
/// their inventory side effects, and read-side reference resolution.
#[derive(Clone)]
pub struct OrderService {
    db: MongoDb,
    sequence: SequenceService,
}

impl OrderService {
    pub fn new(db: MongoDb, sequence: SequenceService) -> Self {
        Self { db, sequence }
    }

    /// Validate availability, snapshot unit prices, and persist a new order
    /// in Quotation. Stock is not touched here; it is reserved on the
    /// Confirm transition.
    pub async fn create(
        &self,
        caller: &Claims,
        req: CreateOrderRequest,
    ) -> Result<OrderView, AppError> {
        let customer_id = req.customer_id.unwrap_or_else(|| caller.sub.clone());

        let mut items = Vec::with_capacity(req.items.len());
        for line in &req.items {
            let genset = self.genset_by_id(&line.genset_id).await?;
            if genset.stock < line.quantity {
                return Err(AppError::OutOfStock {
                    model: genset.model,
                    available: genset.stock,
                    requested: line.quantity,
                });
            }
            items.push(OrderItem::new(
                genset.id,
                line.quantity,
                genset.price,
                line.discount.unwrap_or(0.0),
            ));
        }

        let order_number = self.sequence.next_order_number().await?;
        let order = SalesOrder::new(
            customer_id,
            order_number,
            items,
            req.shipping_cost.unwrap_or(0.0),
            req.delivery_address,
            req.payment_method,
            req.delivery_date,
            req.notes,
        );

        self.db.sales_orders().insert_one(&order, None).await?;
        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = order.total_amount,
            "Order created"
        );

        self.resolve_view(order).await
    }

    pub async fn list(&self, caller: &Claims, query: OrderQuery) -> Result<Vec<OrderView>, AppError> {
        let mut filter = doc! {};
        if caller.role.is_staff() {
            if let Some(customer_id) = query.customer_id {
                filter.insert("customer_id", customer_id);
            }
        } else {
            // Customers only ever see their own orders.
            filter.insert("customer_id", &caller.sub);
        }
        if let Some(status) = query.status {
            filter.insert("status", bson::to_bson(&status)?);
        }

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let orders: Vec<SalesOrder> = self
            .db
            .sales_orders()
            .find(filter, options)
            .await?
            .try_collect()
            .await?;

        self.resolve_views(orders).await
    }

    pub async fn by_customer(
        &self,
        caller: &Claims,
        customer_id: &str,
    ) -> Result<Vec<OrderView>, AppError> {
        crate::middleware::policy::require_owner_or_staff(caller, customer_id)?;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let orders: Vec<SalesOrder> = self
            .db
            .sales_orders()
            .find(doc! { "customer_id": customer_id }, options)
            .await?
            .try_collect()
            .await?;

        self.resolve_views(orders).await
    }

    pub async fn get(&self, caller: &Claims, id: &str) -> Result<OrderView, AppError> {
        let order = self.order_by_id(id).await?;
        crate::middleware::policy::require_owner_or_staff(caller, &order.customer_id)?;
        self.resolve_view(order).await
    }

    /// Generic status update. Transitions into Confirmed reserve stock;
    /// Confirmed -> Cancelled restores it; everything else is a pure field
    /// update. Illegal edges are rejected without side effects.
    pub async fn update_status(
        &self,
        id: &str,
        next: OrderStatus,
    ) -> Result<SalesOrder, AppError> {
        let order = self.order_by_id(id).await?;
        self.transition(order, next).await
    }

    /// Convenience cancel. Restores stock only when the order was
    /// Confirmed; a second cancel fails the transition check, so stock is
    /// never restored twice.
    pub async fn cancel(&self, caller: &Claims, id: &str) -> Result<SalesOrder, AppError> {
        let order = self.order_by_id(id).await?;
        crate::middleware::policy::require_owner_or_staff(caller, &order.customer_id)?;
        self.transition(order, OrderStatus::Cancelled).await
    }

    /// Payment status is the one field that stays mutable after Delivered.
    pub async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
    ) -> Result<SalesOrder, AppError> {
        let mut order = self.order_by_id(id).await?;
        order.payment_status = payment_status;
        order.updated_at = chrono::Utc::now();

        self.db
            .sales_orders()
            .update_one(
                doc! { "_id": &order.id },
                doc! { "$set": {
                    "payment_status": bson::to_bson(&payment_status)?,
                    "updated_at": bson::DateTime::from_chrono(order.updated_at),
                } },
                None,
            )
            .await?;
        Ok(order)
    }

    /// Permanent removal. A Confirmed order holds reserved stock, so it
    /// must be cancelled first; no stock reconciliation happens here.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let order = self.order_by_id(id).await?;
        if order.status == OrderStatus::Confirmed {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Order {} is Confirmed; cancel it before deleting",
                order.order_number
            )));
        }
        self.db
            .sales_orders()
            .delete_one(doc! { "_id": &order.id }, None)
            .await?;
        tracing::info!(order_id = %order.id, "Order deleted");
        Ok(())
    }

    async fn transition(
        &self,
        mut order: SalesOrder,
        next: OrderStatus,
    ) -> Result<SalesOrder, AppError> {
        let prev = order.status;
        if !prev.can_transition_to(next) {
            return Err(AppError::InvalidTransition {
                from: prev.to_string(),
                to: next.to_string(),
            });
        }

        if next == OrderStatus::Confirmed {
            self.reserve_stock(&order).await?;
        } else if prev == OrderStatus::Confirmed && next == OrderStatus::Cancelled {
            self.restore_stock(&order).await?;
        }

        order.status = next;
        order.updated_at = chrono::Utc::now();
        self.db
            .sales_orders()
            .update_one(
                doc! { "_id": &order.id },
                doc! { "$set": {
                    "status": bson::to_bson(&next)?,
                    "updated_at": bson::DateTime::from_chrono(order.updated_at),
                } },
                None,
            )
            .await?;

        tracing::info!(
            order_id = %order.id,
            from = %prev,
            to = %next,
            "Order status updated"
        );
        Ok(order)
    }

    /// Decrement every line's stock atomically. On the first line that
    /// cannot be reserved, previously reserved lines are released and the
    /// whole transition fails, leaving the order status unchanged.
    async fn reserve_stock(&self, order: &SalesOrder) -> Result<(), AppError> {
        for (idx, item) in order.items.iter().enumerate() {
            if !self.adjust_stock(&item.genset_id, -item.quantity).await? {
                for reserved in &order.items[..idx] {
                    self.adjust_stock(&reserved.genset_id, reserved.quantity)
                        .await?;
                }
                let genset = self.genset_by_id(&item.genset_id).await?;
                return Err(AppError::OutOfStock {
                    model: genset.model,
                    available: genset.stock,
                    requested: item.quantity,
                });
            }
        }
        Ok(())
    }

    async fn restore_stock(&self, order: &SalesOrder) -> Result<(), AppError> {
        for item in &order.items {
            self.adjust_stock(&item.genset_id, item.quantity).await?;
        }
        Ok(())
    }

    /// Single conditional atomic update: a decrement only applies while the
    /// resulting stock stays non-negative.
    async fn adjust_stock(&self, genset_id: &str, delta: i64) -> Result<bool, AppError> {
        let mut filter = doc! { "_id": genset_id };
        if delta < 0 {
            filter.insert("stock", doc! { "$gte": -delta });
        }
        let result = self
            .db
            .gensets()
            .update_one(
                filter,
                doc! {
                    "$inc": { "stock": delta },
                    "$set": { "updated_at": bson::DateTime::now() },
                },
                None,
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn order_by_id(&self, id: &str) -> Result<SalesOrder, AppError> {
        self.db
            .sales_orders()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))
    }

    async fn genset_by_id(&self, id: &str) -> Result<Genset, AppError> {
        self.db
            .gensets()
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Genset {} not found", id)))
    }

    async fn resolve_view(&self, order: SalesOrder) -> Result<OrderView, AppError> {
        self.resolve_views(vec![order])
            .await?
            .pop()
            .ok_or_else(|| AppError::InternalError(anyhow::anyhow!("Order view resolution failed")))
    }

    /// Resolve customer and catalog references for display with one batch
    /// lookup per collection.
    async fn resolve_views(&self, orders: Vec<SalesOrder>) -> Result<Vec<OrderView>, AppError> {
        let customer_ids: Vec<&str> = orders.iter().map(|o| o.customer_id.as_str()).collect();
        let genset_ids: Vec<&str> = orders
            .iter()
            .flat_map(|o| o.items.iter().map(|i| i.genset_id.as_str()))
            .collect();

        let customers: HashMap<String, Customer> = self
            .db
            .customers()
            .find(doc! { "_id": { "$in": customer_ids } }, None)
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

        Ok(orders
            .into_iter()
            .map(|order| {
                let customer = customers.get(&order.customer_id).map(CustomerSummary::from);
                let items = order
                    .items
                    .iter()
                    .map(|item| {
                        OrderItemView::new(
                            item,
                            gensets.get(&item.genset_id).map(GensetSummary::from),
                        )
                    })
                    .collect();
                OrderView::new(order, customer, items)
            })
            .collect())
    }
}
