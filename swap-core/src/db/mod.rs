pub mod factory;
pub mod memory;
pub mod repository;

pub use factory::{DbConfig, RepositoryFactory, RepositoryRegistry};
pub use memory::{MemoryFactory, MemoryRepository};
pub use repository::{RepositoryError, SwapRepository};
