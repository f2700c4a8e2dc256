//! HTTP API: configuration, farm-scoped routing and response mapping.

pub mod app;
pub mod config;
pub mod context;
