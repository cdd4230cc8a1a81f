//! Domain types and pure business rules for the contractor-management backend.
//!
//! Nothing in this crate performs I/O. The database and HTTP layers call into
//! these modules for validation, payment accrual arithmetic and role checks.

pub mod error;
pub mod payment;
pub mod roles;
pub mod schedule;
pub mod types;
pub mod validation;
