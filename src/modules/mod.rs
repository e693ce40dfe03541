//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the client for the hosted document registry (database table + object storage).

pub mod registry;
