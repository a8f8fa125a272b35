//! Domains module containing business logic organized by bounded contexts.
//!
//! `analysis` and `validation` are pure and synchronous; `tools` adapts them
//! to the MCP tool surface.

pub mod analysis;
pub mod tools;
pub mod validation;
