//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create/update DTOs where the API accepts input

pub mod company;
pub mod history;
pub mod label;
pub mod notification;
pub mod rating;
pub mod reply;
pub mod ticket;
pub mod ticket_type;
pub mod user;
