//! CLI command implementations

pub mod check;
pub mod health;
pub mod predict;
pub mod symptoms;
