//! veridoc - A strict, schema-driven document validation engine
//!
//! Schemas compile into validator registries; runners evaluate documents
//! and update payloads against them and report every failing path at once.

pub mod schema;
pub mod validation;
