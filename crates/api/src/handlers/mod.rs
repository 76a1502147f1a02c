//! HTTP request handlers, grouped by resource.

pub mod auth;
pub mod monitoring;
pub mod notifications;
pub mod tickets;
