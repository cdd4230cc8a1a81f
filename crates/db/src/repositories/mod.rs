//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run inside
//! a caller-owned transaction take `&mut sqlx::Transaction` instead.

pub mod attendance_repo;
pub mod company_repo;
pub mod contractor_repo;
pub mod officer_repo;
pub mod payment_repo;
pub mod project_repo;
pub mod user_repo;
pub mod worker_repo;

pub use attendance_repo::AttendanceRepo;
pub use company_repo::CompanyRepo;
pub use contractor_repo::ContractorRepo;
pub use officer_repo::OfficerRepo;
pub use payment_repo::PaymentRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
pub use worker_repo::WorkerRepo;
