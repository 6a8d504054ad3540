pub mod batches;
pub mod events;
