//! # seedbed: migratable database seeders
//!
//! Tracks which environment-scoped seed scripts have been applied against a
//! database, so that re-running `seed` only executes the new ones. Every run
//! is recorded as one batch, which makes whole invocations reversible with
//! rollback, reset, and refresh.
//!
//! Seed scripts are plain `.sql` files laid out per environment:
//!
//! ```text
//! database/seeders/
//!     all/        applied under every environment
//!     staging/    applied only when seeding "staging"
//!     production/
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod migrator;
pub mod repository;
pub mod seeds;

// Re-export core traits and types
pub use config::*;
pub use connection::*;
pub use error::*;
pub use migrator::*;
pub use repository::*;
pub use seeds::*;
