//! Serde structs for the external record-store tables.
//!
//! The assistant does not own these schemas - the spreadsheet/relational
//! backend does. These structs mirror the columns the handlers read and
//! write; unknown columns are ignored on the way in and optional fields are
//! skipped on the way out so partial rows round-trip cleanly.

pub mod customer;
pub mod order;
pub mod product;
pub mod survey;

pub use customer::Customer;
pub use order::{LineItem, Order, OrderReturn, ShippingStatus};
pub use product::Product;
pub use survey::Survey;
