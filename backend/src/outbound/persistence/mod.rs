//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between row structs and domain types; the
//! structural rules of the experience aggregate arrive pre-computed in a
//! `WritePlan`. Row structs (`models`) and table definitions (`schema`) stay
//! private to this module.
//!
//! ```ignore
//! use experience_backend::outbound::persistence::{DbPool, DieselExperienceStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/experiences")).await?;
//! let store = DieselExperienceStore::new(pool);
//! ```

mod diesel_experience_store;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_experience_store::DieselExperienceStore;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
