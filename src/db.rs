pub mod store;
pub use store::{BatchStore, EventStore};
pub mod batch_repo;
pub use batch_repo::BatchRepository;
pub mod events_repo;
pub use events_repo::EventRepository;

#[cfg(test)]
pub mod memory;
