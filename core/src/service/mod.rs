pub mod diet_store;
pub mod dto;
