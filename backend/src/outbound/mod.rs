//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL store and user repository using Diesel
//! - **memory**: in-process store for local runs and tests
//! - **notify**: mail API client and logging fallback
//! - **password**: Argon2id hashing
//! - **poster**: SVG renderer and directory storage
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod memory;
pub mod notify;
pub mod password;
pub mod persistence;
pub mod poster;
