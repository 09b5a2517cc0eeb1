// lib/src/discovery/mod.rs

pub mod session;

pub use session::{DiscoverySession, DiscoverySnapshot, DiscoveryStatus, RouteOutcome};
