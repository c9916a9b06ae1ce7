pub mod accounts;
pub mod database;
pub mod jwt;
pub mod orders;
pub mod reports;
pub mod sequence;
pub mod tickets;

pub use accounts::AccountService;
pub use database::MongoDb;
pub use jwt::{Claims, JwtService};
pub use orders::OrderService;
pub use reports::ReportService;
pub use sequence::SequenceService;
pub use tickets::TicketService;
