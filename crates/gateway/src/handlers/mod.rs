//! API handlers module

pub mod generate;
pub mod health;
pub mod leads;
