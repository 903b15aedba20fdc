//! Service layer.

pub mod notifications;
