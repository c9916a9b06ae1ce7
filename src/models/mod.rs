pub mod customer;
pub mod genset;
pub mod order;
pub mod service_request;

pub use customer::{Address, Customer, CustomerType, Role, SanitizedCustomer};
pub use genset::{Brand, Condition, FuelType, Genset, Phase, Specifications};
pub use order::{OrderItem, OrderStatus, PaymentMethod, PaymentStatus, SalesOrder, TAX_RATE};
pub use service_request::{
    CustomerFeedback, PartUsed, Priority, ServiceRequest, ServiceType, TicketStatus,
};

// Helper module for optional DateTime<Utc> as BSON DateTime
pub(crate) mod opt_chrono_datetime_as_bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(dt) => {
                let bson_dt = bson::DateTime::from_chrono(*dt);
                bson_dt.serialize(serializer)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<bson::DateTime> = Option::deserialize(deserializer)?;
        Ok(opt.map(|dt| dt.to_chrono()))
    }
}
