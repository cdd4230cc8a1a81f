//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod attendance;
pub mod company;
pub mod contractor;
pub mod officer;
pub mod payment;
pub mod project;
pub mod user;
pub mod worker;
