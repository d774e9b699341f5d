//! Command implementations

pub mod check;
pub mod index;
pub mod render;
