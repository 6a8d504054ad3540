pub mod batch;
pub mod events;
