// Adapters layer: concrete implementations for external systems (classifier artifact, http).

pub mod classifier;
pub mod http;
