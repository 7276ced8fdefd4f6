//! Row models shared between the store adapters and the dashboard engine.

pub mod analytics;
