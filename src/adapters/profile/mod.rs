//! Value profile persistence adapters.

mod in_memory;
mod postgres_repository;

pub use in_memory::InMemoryValueProfileRepository;
pub use postgres_repository::PgValueProfileRepository;
