//! Outbound HTTP plumbing shared by the provider clients.

pub mod client;

pub use client::build_http_client;
