//! Enrollment directory implementations.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryEnrollmentDirectory;
pub use postgres::PostgresEnrollmentDirectory;
