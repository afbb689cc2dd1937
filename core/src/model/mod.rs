pub mod diet;
pub mod meal;
