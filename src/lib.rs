//! Ticket Router: assigns customer-service tickets to managers.

pub mod app;
pub mod classify;
pub mod config;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod routing;
